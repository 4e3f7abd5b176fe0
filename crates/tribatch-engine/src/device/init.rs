/// Initialization parameters for [`WgpuDevice`](super::WgpuDevice).
///
/// Only adapter selection is configurable. Target sizes and formats come from
/// the renderer through `Device::create_target`.
#[derive(Debug, Clone)]
pub struct WgpuDeviceInit {
    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    pub power_preference: wgpu::PowerPreference,

    /// Accept a software adapter. Useful on CI machines without a GPU.
    pub force_fallback_adapter: bool,

    /// Limits requested from the adapter/device.
    ///
    /// The defaults are far above what a single batch buffer needs.
    pub required_limits: wgpu::Limits,
}

impl Default for WgpuDeviceInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: false,
            required_limits: wgpu::Limits::downlevel_defaults(),
        }
    }
}
