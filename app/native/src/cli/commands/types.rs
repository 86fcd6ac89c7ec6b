//! Shared types for CLI commands.

use crate::tiling::TilingMode;

/// Tiling mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliTilingMode {
    /// Two independent surfaces.
    Separate,
    /// Master left, slave right.
    #[value(name = "master-slave-x")]
    MasterSlaveX,
    /// Slave left, master right.
    #[value(name = "slave-master-x")]
    SlaveMasterX,
    /// Master on top, slave below.
    #[value(name = "master-slave-y")]
    MasterSlaveY,
    /// Slave on top, master below.
    #[value(name = "slave-master-y")]
    SlaveMasterY,
    /// 720p HDMI frame packing.
    #[value(name = "hdmi-720")]
    Hdmi720,
    /// 1080p HDMI frame packing.
    #[value(name = "hdmi-1080")]
    Hdmi1080,
}

impl From<CliTilingMode> for TilingMode {
    fn from(mode: CliTilingMode) -> Self {
        match mode {
            CliTilingMode::Separate => Self::Separate,
            CliTilingMode::MasterSlaveX => Self::MasterSlaveX,
            CliTilingMode::SlaveMasterX => Self::SlaveMasterX,
            CliTilingMode::MasterSlaveY => Self::MasterSlaveY,
            CliTilingMode::SlaveMasterY => Self::SlaveMasterY,
            CliTilingMode::Hdmi720 => Self::HdmiPacked720,
            CliTilingMode::Hdmi1080 => Self::HdmiPacked1080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tiling_mode_maps_packed_modes() {
        assert_eq!(TilingMode::from(CliTilingMode::Hdmi720), TilingMode::HdmiPacked720);
        assert_eq!(TilingMode::from(CliTilingMode::Hdmi1080), TilingMode::HdmiPacked1080);
        assert_eq!(TilingMode::from(CliTilingMode::SlaveMasterY), TilingMode::SlaveMasterY);
    }
}
