use candle_core::Device;
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

use super::error::EmbeddingError;

/// Picks Metal, then CUDA, then CPU, depending on which GPU features were compiled in.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Using Metal device for model inference");
            return Ok(device);
        }
        Err(e) => {
            warn!(error = %e, "Metal device unavailable");
            failures.push(format!("metal: {e}"));
        }
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Using CUDA device for model inference");
            return Ok(device);
        }
        Err(e) => {
            warn!(error = %e, "CUDA device unavailable");
            failures.push(format!("cuda: {e}"));
        }
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled in, using CPU");
    } else {
        warn!(reason = %failures.join("; "), "Falling back to CPU device");
    }

    Ok(Device::Cpu)
}
