//! Declarative binding table between the Parameter Set and its editing controls.
//!
//! Each entry names one field, its bounds and its label. The debug panel
//! builds its widgets from this table, and command-line overrides are
//! clamped through it, so bounds live in exactly one place.

use super::water::{Rgb, WaterParams};

/// Folder a control is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlGroup {
    BigWaves,
    Color,
    SmallWaves,
}

impl ControlGroup {
    /// Folders in display order
    pub const ALL: [ControlGroup; 3] = [Self::BigWaves, Self::Color, Self::SmallWaves];

    pub fn title(self) -> &'static str {
        match self {
            Self::BigWaves => "BigWaves",
            Self::Color => "Color",
            Self::SmallWaves => "SmallWaves",
        }
    }
}

/// Widget type plus field accessor
#[derive(Clone, Copy)]
pub enum ControlKind {
    /// Continuous slider over `min..=max`
    Scalar {
        field: fn(&mut WaterParams) -> &mut f32,
        min: f32,
        max: f32,
        step: f32,
    },

    /// Integer slider over `min..=max`
    Integer {
        field: fn(&mut WaterParams) -> &mut u32,
        min: u32,
        max: u32,
    },

    /// Color picker (any sRGB color is valid)
    Color { field: fn(&mut WaterParams) -> &mut Rgb },
}

/// One editable Parameter Set field
#[derive(Clone, Copy)]
pub struct Control {
    pub group: ControlGroup,
    pub label: &'static str,
    pub kind: ControlKind,
}

impl Control {
    /// Force the bound field back into range
    pub fn clamp(&self, params: &mut WaterParams) {
        match self.kind {
            ControlKind::Scalar { field, min, max, .. } => {
                let value = field(params);
                // NaN survives f32::clamp
                *value = if value.is_finite() {
                    value.clamp(min, max)
                } else {
                    min
                };
            }
            ControlKind::Integer { field, min, max } => {
                let value = field(params);
                *value = (*value).clamp(min, max);
            }
            ControlKind::Color { .. } => {}
        }
    }

    /// Current value formatted for logs
    ///
    /// Takes `&mut` only because the table's accessors are shared with the
    /// widgets; nothing is written.
    pub fn describe(&self, params: &mut WaterParams) -> String {
        match self.kind {
            ControlKind::Scalar { field, .. } => format!("{:.3}", field(params)),
            ControlKind::Integer { field, .. } => field(params).to_string(),
            ControlKind::Color { field } => field(params).to_string(),
        }
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("group", &self.group)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

const STEP: f32 = 0.001;

/// Every editable field, in panel order
pub static CONTROLS: &[Control] = &[
    // BigWaves
    Control {
        group: ControlGroup::BigWaves,
        label: "uBigWavesElevation",
        kind: ControlKind::Scalar {
            field: |p| &mut p.big_wave_elevation,
            min: 0.0,
            max: 1.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::BigWaves,
        label: "uBigWavesFrequency.X",
        kind: ControlKind::Scalar {
            field: |p| &mut p.big_wave_frequency.x,
            min: 0.0,
            max: 10.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::BigWaves,
        label: "uBigWavesFrequency.Y",
        kind: ControlKind::Scalar {
            field: |p| &mut p.big_wave_frequency.y,
            min: 0.0,
            max: 10.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::BigWaves,
        label: "uBigWavesSpeed",
        kind: ControlKind::Scalar {
            field: |p| &mut p.big_wave_speed,
            min: 0.0,
            max: 10.0,
            step: STEP,
        },
    },
    // SmallWaves
    Control {
        group: ControlGroup::SmallWaves,
        label: "uSmallWavesElevation",
        kind: ControlKind::Scalar {
            field: |p| &mut p.small_wave_elevation,
            min: 0.0,
            max: 1.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::SmallWaves,
        label: "uSmallWavesFrequency",
        kind: ControlKind::Scalar {
            field: |p| &mut p.small_wave_frequency,
            min: 0.0,
            max: 30.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::SmallWaves,
        label: "uSmallWavesSpeed",
        kind: ControlKind::Scalar {
            field: |p| &mut p.small_wave_speed,
            min: 0.0,
            max: 4.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::SmallWaves,
        label: "uSmallWavesIterations",
        kind: ControlKind::Integer {
            field: |p| &mut p.small_wave_iterations,
            min: 0,
            max: 10,
        },
    },
    // Color
    Control {
        group: ControlGroup::Color,
        label: "depthColor",
        kind: ControlKind::Color {
            field: |p| &mut p.depth_color,
        },
    },
    Control {
        group: ControlGroup::Color,
        label: "surfaceColor",
        kind: ControlKind::Color {
            field: |p| &mut p.surface_color,
        },
    },
    Control {
        group: ControlGroup::Color,
        label: "uColorOffset",
        kind: ControlKind::Scalar {
            field: |p| &mut p.color_offset,
            min: 0.0,
            max: 1.0,
            step: STEP,
        },
    },
    Control {
        group: ControlGroup::Color,
        label: "uColorMultiplier",
        kind: ControlKind::Scalar {
            field: |p| &mut p.color_multiplier,
            min: 0.0,
            max: 10.0,
            step: STEP,
        },
    },
];

/// Controls belonging to one folder
pub fn controls_in(group: ControlGroup) -> impl Iterator<Item = &'static Control> {
    CONTROLS.iter().filter(move |c| c.group == group)
}

/// Clamp every bounded field of `params` into its control's range
pub fn clamp_all(params: &mut WaterParams) {
    for control in CONTROLS {
        control.clamp(params);
    }
}
