use candle_core::{utils, Device};
use std::str::FromStr;

use crate::{Error, Result};

/// The compute device requested for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceOption {
    /// Use an accelerator if one is available, otherwise the CPU.
    #[default]
    Auto,
    Cpu,
    Metal,
    Cuda(usize),
}

impl FromStr for DeviceOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(DeviceOption::Auto),
            "cpu" => Ok(DeviceOption::Cpu),
            "metal" => Ok(DeviceOption::Metal),
            "cuda" => Ok(DeviceOption::Cuda(0)),
            s if s.starts_with("cuda:") => {
                let id = s["cuda:".len()..]
                    .parse::<usize>()
                    .map_err(|_| Error::msg(format!("Invalid CUDA device id: {}", s)))?;
                Ok(DeviceOption::Cuda(id))
            }
            _ => Err(Error::msg(format!("Invalid device option: {}", s))),
        }
    }
}

/// Gets the [`candle_core::Device`] for the requested option. `Auto` picks CUDA, then Metal, then
/// the CPU, depending on the enabled features and the hardware that is present.
///
/// # Errors
///
/// Returns an error if an explicitly requested device is not available.
pub fn get_device(option: DeviceOption) -> Result<Device> {
    let device = match option {
        DeviceOption::Auto => {
            if cfg!(feature = "cuda") && utils::cuda_is_available() {
                Device::new_cuda(0)?
            } else if cfg!(feature = "metal") && utils::metal_is_available() {
                Device::new_metal(0)?
            } else {
                Device::Cpu
            }
        }
        DeviceOption::Cuda(device_id) if cfg!(feature = "cuda") => Device::new_cuda(device_id)?,
        DeviceOption::Metal if cfg!(feature = "metal") => Device::new_metal(0)?,
        DeviceOption::Cpu => Device::Cpu,
        option => {
            return Err(Error::msg(format!(
                "Requested device {:?} is not available",
                option
            )))
        }
    };

    tracing::debug!("Selected device {:?} for option {:?}", device, option);
    Ok(device)
}
