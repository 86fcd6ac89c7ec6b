//! Window attributes.
//!
//! [`WinAttr`] is the typed form of a single window setting. Embedders that
//! only have numeric `(key, value)` pairs (C bindings, scripting layers) go
//! through [`WinAttr::from_raw`], where unknown keys and out-of-range values
//! are logged and skipped.

use serde::{Deserialize, Serialize};

use super::WindowConfig;
use crate::tiling::{SlaveMode, SplitMode};

/// Numeric attribute identifiers. `0` terminates a raw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum AttrKey {
    GlQuadStereo = 1,
    GlDebug = 2,
    GlDepthSize = 3,
    GlStencilSize = 4,
    BlockSleepSystem = 5,
    BlockSleepDisplay = 6,
    GlobalMediaKeys = 7,
    Slave = 8,
    SlaveMonitorId = 9,
    SplitMode = 10,
    EvenPixels = 11,
    ExclusiveFullscreen = 12,
}

impl AttrKey {
    /// Raw id that ends an attribute list.
    pub const END: u32 = 0;

    pub const ALL: [Self; 12] = [
        Self::GlQuadStereo,
        Self::GlDebug,
        Self::GlDepthSize,
        Self::GlStencilSize,
        Self::BlockSleepSystem,
        Self::BlockSleepDisplay,
        Self::GlobalMediaKeys,
        Self::Slave,
        Self::SlaveMonitorId,
        Self::SplitMode,
        Self::EvenPixels,
        Self::ExclusiveFullscreen,
    ];

    /// Looks up a raw id.
    #[must_use]
    pub fn from_u32(raw: u32) -> Option<Self> { Self::ALL.into_iter().find(|key| *key as u32 == raw) }
}

/// A single typed window setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinAttr {
    GlQuadStereo(bool),
    GlDebug(bool),
    GlDepthSize(u8),
    GlStencilSize(u8),
    BlockSleepSystem(bool),
    BlockSleepDisplay(bool),
    GlobalMediaKeys(bool),
    Slave(SlaveMode),
    SlaveMonitorId(usize),
    SplitMode(SplitMode),
    EvenPixels(bool),
    ExclusiveFullscreen(bool),
}

impl WinAttr {
    /// Key of this attribute.
    #[must_use]
    pub const fn key(self) -> AttrKey {
        match self {
            Self::GlQuadStereo(_) => AttrKey::GlQuadStereo,
            Self::GlDebug(_) => AttrKey::GlDebug,
            Self::GlDepthSize(_) => AttrKey::GlDepthSize,
            Self::GlStencilSize(_) => AttrKey::GlStencilSize,
            Self::BlockSleepSystem(_) => AttrKey::BlockSleepSystem,
            Self::BlockSleepDisplay(_) => AttrKey::BlockSleepDisplay,
            Self::GlobalMediaKeys(_) => AttrKey::GlobalMediaKeys,
            Self::Slave(_) => AttrKey::Slave,
            Self::SlaveMonitorId(_) => AttrKey::SlaveMonitorId,
            Self::SplitMode(_) => AttrKey::SplitMode,
            Self::EvenPixels(_) => AttrKey::EvenPixels,
            Self::ExclusiveFullscreen(_) => AttrKey::ExclusiveFullscreen,
        }
    }

    /// Decodes a raw `(key, value)` pair.
    ///
    /// Returns `None` (after a warning) for unknown keys and for values the
    /// key cannot hold.
    #[must_use]
    pub fn from_raw(key: u32, value: i64) -> Option<Self> {
        let Some(attr_key) = AttrKey::from_u32(key) else {
            tracing::warn!(key, value, "unknown window attribute ignored");
            return None;
        };

        let attr = match attr_key {
            AttrKey::GlQuadStereo => Some(Self::GlQuadStereo(value != 0)),
            AttrKey::GlDebug => Some(Self::GlDebug(value != 0)),
            AttrKey::GlDepthSize => u8::try_from(value).ok().map(Self::GlDepthSize),
            AttrKey::GlStencilSize => u8::try_from(value).ok().map(Self::GlStencilSize),
            AttrKey::BlockSleepSystem => Some(Self::BlockSleepSystem(value != 0)),
            AttrKey::BlockSleepDisplay => Some(Self::BlockSleepDisplay(value != 0)),
            AttrKey::GlobalMediaKeys => Some(Self::GlobalMediaKeys(value != 0)),
            AttrKey::Slave => slave_mode_from_raw(value).map(Self::Slave),
            AttrKey::SlaveMonitorId => usize::try_from(value).ok().map(Self::SlaveMonitorId),
            AttrKey::SplitMode => split_mode_from_raw(value).map(Self::SplitMode),
            AttrKey::EvenPixels => Some(Self::EvenPixels(value != 0)),
            AttrKey::ExclusiveFullscreen => Some(Self::ExclusiveFullscreen(value != 0)),
        };

        if attr.is_none() {
            tracing::warn!(key = ?attr_key, value, "window attribute value out of range, ignored");
        }
        attr
    }

    /// Decodes a raw list, stopping at [`AttrKey::END`].
    #[must_use]
    pub fn from_raw_list(list: &[(u32, i64)]) -> Vec<Self> {
        list.iter()
            .take_while(|(key, _)| *key != AttrKey::END)
            .filter_map(|&(key, value)| Self::from_raw(key, value))
            .collect()
    }
}

const fn slave_mode_from_raw(value: i64) -> Option<SlaveMode> {
    match value {
        0 => Some(SlaveMode::Off),
        1 => Some(SlaveMode::HLineTop),
        2 => Some(SlaveMode::HTop2Px),
        3 => Some(SlaveMode::HLineBottom),
        4 => Some(SlaveMode::Independent),
        5 => Some(SlaveMode::IndependentMirrorX),
        6 => Some(SlaveMode::IndependentMirrorY),
        _ => None,
    }
}

const fn split_mode_from_raw(value: i64) -> Option<SplitMode> {
    match value {
        0 => Some(SplitMode::Auto),
        1 => Some(SplitMode::Separate),
        2 => Some(SplitMode::Hdmi720),
        3 => Some(SplitMode::Hdmi1080),
        _ => None,
    }
}

impl WindowConfig {
    /// Applies one attribute.
    pub const fn apply(&mut self, attr: WinAttr) {
        match attr {
            WinAttr::GlQuadStereo(on) => self.gl_quad_stereo = on,
            WinAttr::GlDebug(on) => self.gl_debug = on,
            WinAttr::GlDepthSize(bits) => self.gl_depth_size = bits,
            WinAttr::GlStencilSize(bits) => self.gl_stencil_size = bits,
            WinAttr::BlockSleepSystem(on) => self.block_sleep_system = on,
            WinAttr::BlockSleepDisplay(on) => self.block_sleep_display = on,
            WinAttr::GlobalMediaKeys(on) => self.global_media_keys = on,
            WinAttr::Slave(mode) => self.slave = mode,
            WinAttr::SlaveMonitorId(index) => self.slave_monitor = index,
            WinAttr::SplitMode(mode) => self.split_mode = mode,
            WinAttr::EvenPixels(on) => self.even_pixels = on,
            WinAttr::ExclusiveFullscreen(on) => self.exclusive_fullscreen = on,
        }
    }

    /// Current value of `key`.
    #[must_use]
    pub const fn get(&self, key: AttrKey) -> WinAttr {
        match key {
            AttrKey::GlQuadStereo => WinAttr::GlQuadStereo(self.gl_quad_stereo),
            AttrKey::GlDebug => WinAttr::GlDebug(self.gl_debug),
            AttrKey::GlDepthSize => WinAttr::GlDepthSize(self.gl_depth_size),
            AttrKey::GlStencilSize => WinAttr::GlStencilSize(self.gl_stencil_size),
            AttrKey::BlockSleepSystem => WinAttr::BlockSleepSystem(self.block_sleep_system),
            AttrKey::BlockSleepDisplay => WinAttr::BlockSleepDisplay(self.block_sleep_display),
            AttrKey::GlobalMediaKeys => WinAttr::GlobalMediaKeys(self.global_media_keys),
            AttrKey::Slave => WinAttr::Slave(self.slave),
            AttrKey::SlaveMonitorId => WinAttr::SlaveMonitorId(self.slave_monitor),
            AttrKey::SplitMode => WinAttr::SplitMode(self.split_mode),
            AttrKey::EvenPixels => WinAttr::EvenPixels(self.even_pixels),
            AttrKey::ExclusiveFullscreen => WinAttr::ExclusiveFullscreen(self.exclusive_fullscreen),
        }
    }
}
