//! Lint diagnostics for control layouts.
//!
//! Reports data problems without modifying the layout. Widgets tolerate
//! every issue listed here at runtime (degenerate shapes fall back to
//! rectangles, unbound keys never dispatch); the editor surfaces them.

use crate::id::ControlId;
use crate::model::{ControlData, ControlKind, ControlShape};
use std::collections::HashSet;

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    /// Likely a mistake; the control will not behave as configured.
    Warning,
    Info,
}

#[derive(Debug, Clone)]
pub struct LintDiagnostic {
    pub control_id: ControlId,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "size-range", "degenerate-polygon").
    pub rule: &'static str,
}

/// Run all lint rules over a layout.
#[must_use]
pub fn lint_controls(controls: &[ControlData]) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    let mut seen = HashSet::new();
    for control in controls {
        if !seen.insert(control.id()) {
            push(
                &mut diags,
                control,
                LintSeverity::Warning,
                "duplicate-id",
                format!("Control id `{}` is used more than once.", control.id()),
            );
        }
        lint_geometry(control, &mut diags);
        lint_kind(control, &mut diags);
    }
    diags
}

// ─── Rules ────────────────────────────────────────────────────────────────

fn lint_geometry(control: &ControlData, diags: &mut Vec<LintDiagnostic>) {
    let c = &control.common;
    for (field, v) in [("width", c.width), ("height", c.height)] {
        if !(v > 0.0 && v <= 1.0) {
            push(
                diags,
                control,
                LintSeverity::Warning,
                "size-range",
                format!("`{field}` is {v}; expected a screen fraction in (0, 1]."),
            );
        }
    }
    for (field, v) in [
        ("opacity", c.opacity),
        ("borderOpacity", c.border_opacity),
        ("textOpacity", c.text_opacity),
    ] {
        if !(0.0..=1.0).contains(&v) {
            push(
                diags,
                control,
                LintSeverity::Warning,
                "opacity-range",
                format!("`{field}` is {v}; expected a value in [0, 1]."),
            );
        }
    }
}

fn lint_kind(control: &ControlData, diags: &mut Vec<LintDiagnostic>) {
    match &control.kind {
        ControlKind::Button(b) => {
            if b.shape == ControlShape::Polygon && b.polygon_points.len() < 3 {
                push(
                    diags,
                    control,
                    LintSeverity::Warning,
                    "degenerate-polygon",
                    format!(
                        "Polygon has {} point(s); the full rectangle will be used instead.",
                        b.polygon_points.len()
                    ),
                );
            }
            if b.keycode.is_unknown() {
                push(
                    diags,
                    control,
                    LintSeverity::Info,
                    "unbound-key",
                    "Button is not bound to a key and will not send input.".to_string(),
                );
            }
        }
        ControlKind::RadialMenu(r) => {
            if !(0.0..1.0).contains(&r.dead_zone_ratio) {
                push(
                    diags,
                    control,
                    LintSeverity::Warning,
                    "dead-zone-range",
                    format!("`deadZoneRatio` is {}; expected [0, 1).", r.dead_zone_ratio),
                );
            }
            if !(4..=12).contains(&r.sector_count) {
                push(
                    diags,
                    control,
                    LintSeverity::Warning,
                    "sector-count",
                    format!("`sectorCount` is {}; expected 4 to 12.", r.sector_count),
                );
            }
            if (r.sectors.len() as u32) < r.sector_count {
                push(
                    diags,
                    control,
                    LintSeverity::Info,
                    "missing-sectors",
                    format!(
                        "{} of {} sectors are configured; the rest send nothing.",
                        r.sectors.len(),
                        r.sector_count
                    ),
                );
            }
        }
        ControlKind::DPad(_)
        | ControlKind::Text(_)
        | ControlKind::Joystick(_)
        | ControlKind::TouchPad(_)
        | ControlKind::MouseWheel(_) => {}
    }
}

fn push(
    diags: &mut Vec<LintDiagnostic>,
    control: &ControlData,
    severity: LintSeverity,
    rule: &'static str,
    message: String,
) {
    diags.push(LintDiagnostic {
        control_id: control.id(),
        message,
        severity,
        rule,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::KeyCode;
    use crate::model::{ButtonData, RadialMenuData};

    fn rules(diags: &[LintDiagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.rule).collect()
    }

    #[test]
    fn clean_layout_has_no_findings() {
        let button = ControlData::button(ButtonData {
            keycode: KeyCode::KEYBOARD_SPACE,
            ..Default::default()
        });
        let menu = ControlData::radial_menu(RadialMenuData::default());
        assert!(lint_controls(&[button, menu]).is_empty());
    }

    #[test]
    fn flags_degenerate_polygon_and_unbound_key() {
        let mut data = ButtonData {
            shape: ControlShape::Polygon,
            ..Default::default()
        };
        data.polygon_points.push(crate::model::NormPoint::new(0.0, 0.0));
        let diags = lint_controls(&[ControlData::button(data)]);
        assert_eq!(rules(&diags), vec!["degenerate-polygon", "unbound-key"]);
    }

    #[test]
    fn flags_radial_ranges() {
        let menu = ControlData::radial_menu(RadialMenuData {
            sector_count: 16,
            dead_zone_ratio: 1.0,
            ..Default::default()
        });
        let diags = lint_controls(&[menu]);
        assert_eq!(
            rules(&diags),
            vec!["dead-zone-range", "sector-count", "missing-sectors"]
        );
    }

    #[test]
    fn flags_sizes_and_duplicates() {
        let a = ControlData::button(ButtonData {
            keycode: KeyCode::KEYBOARD_E,
            ..Default::default()
        })
        .at(0.0, 0.0, 0.0, 1.5);
        let mut b = a.clone();
        b.common.opacity = 2.0;
        let diags = lint_controls(&[a, b]);
        assert_eq!(
            rules(&diags),
            vec![
                "size-range",
                "size-range",
                "duplicate-id",
                "size-range",
                "size-range",
                "opacity-range"
            ]
        );
    }
}
