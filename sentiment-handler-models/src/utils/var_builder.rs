use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use sentiment_handler::Result;

/// Prefix added by `torch.nn.DataParallel` when a wrapped model is saved.
const DATA_PARALLEL_PREFIX: &str = "module.";

/// Maps a tensor name from a PyTorch checkpoint to the name the model asks for. This handles:
///
/// 1. Checkpoints saved from a `DataParallel` wrapper, whose names start with `module.`.
/// 2. Layer norms saved with the old `gamma` and `beta` names instead of `weight` and `bias`.
pub fn normalize_tensor_name(name: &str) -> String {
    let name = name.strip_prefix(DATA_PARALLEL_PREFIX).unwrap_or(name);
    match name.rsplit_once('.') {
        Some((prefix, "gamma")) => format!("{prefix}.weight"),
        Some((prefix, "beta")) => format!("{prefix}.bias"),
        _ => name.to_string(),
    }
}

/// Reads every tensor stored in a PyTorch `state_dict` file and normalizes their names.
///
/// # Arguments
///
/// * `path` - The path to the `.bin`/`.pth` file.
///
/// # Returns
///
/// A map from tensor name to tensor, with the tensors on the CPU.
pub fn load_pth_tensors<P: AsRef<Path>>(path: P) -> Result<HashMap<String, Tensor>> {
    let tensors = candle_core::pickle::read_all(path)?
        .into_iter()
        .map(|(name, tensor)| (normalize_tensor_name(&name), tensor))
        .collect::<HashMap<_, _>>();
    tracing::debug!("Read {} tensors from checkpoint", tensors.len());
    Ok(tensors)
}

/// Creates a `VarBuilder` over a PyTorch checkpoint. Tensors are moved to `device` and converted
/// to `dtype` as the model retrieves them.
pub fn var_builder_from_pth<P: AsRef<Path>>(
    path: P,
    dtype: DType,
    device: &Device,
) -> Result<VarBuilder<'static>> {
    let tensors = load_pth_tensors(path)?;
    Ok(VarBuilder::from_tensors(tensors, dtype, device))
}
