use std::io;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

/// Files a BERT-family model directory must contain.
pub const MODEL_DIR_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

/// Returns the first required model file missing from `model_dir`.
pub fn missing_model_file(model_dir: &Path) -> Option<PathBuf> {
    MODEL_DIR_FILES
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| !path.exists())
}

/// Loads `tokenizer.json` from a model directory, truncating inputs to `max_len` tokens.
pub fn load_tokenizer_with_truncation(model_dir: &Path, max_len: usize) -> io::Result<Tokenizer> {
    let mut tokenizer =
        Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };

    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| io::Error::other(format!("Failed to configure truncation: {}", e)))?;

    Ok(tokenizer)
}

/// Scales `vector` to unit length; the zero vector is returned unchanged.
pub fn l2_normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
