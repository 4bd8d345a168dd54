//! Control data model.
//!
//! A layout is a flat list of `ControlData` values. Each value carries the
//! fields every control shares (placement as screen fractions, rotation,
//! opacities, colors) plus a kind-specific payload. The runtime widgets read
//! these values; creating and persisting them is the editor's job.
//!
//! Serialized field names are camelCase and the kind is carried in a `type`
//! tag, matching the layout files the launcher ships.

use crate::id::ControlId;
use crate::keycode::KeyCode;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Colors ──────────────────────────────────────────────────────────────

/// Packed ARGB color (`0xAARRGGBB`).
///
/// Serialized as a signed 32-bit integer, the way layout files store it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Rgba(pub u32);

impl From<i64> for Rgba {
    fn from(v: i64) -> Self {
        Rgba(v as u32)
    }
}

impl From<Rgba> for i64 {
    fn from(c: Rgba) -> Self {
        c.0 as i32 as i64
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba(0xFFFF_FFFF);
    pub const BLACK: Rgba = Rgba(0xFF00_0000);
    pub const TRANSPARENT: Rgba = Rgba(0);

    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Rgba((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Rgba(self.0 & 0x00FF_FFFF | (a as u32) << 24)
    }

    /// Replace the alpha channel with `opacity` in [0, 1].
    pub fn with_opacity(self, opacity: f32) -> Self {
        self.with_alpha(unit_to_byte(opacity))
    }

    /// Relative luminance of the sRGB color, alpha ignored. 0 = black, 1 = white.
    pub fn luminance(self) -> f32 {
        fn linear(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.red()) + 0.7152 * linear(self.green()) + 0.0722 * linear(self.blue())
    }
}

/// Map an opacity in [0, 1] to a byte alpha, clamping out-of-range input.
pub fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// Outline of a control, used for hit testing, clipping and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlShape {
    #[default]
    Rectangle,
    Circle,
    /// Custom outline from `ButtonData::polygon_points`.
    Polygon,
}

/// Polygon vertex in normalized (0..1) control-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

impl NormPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

pub type PolygonPoints = SmallVec<[NormPoint; 8]>;

// ─── Textures ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    /// Keep aspect ratio, fit inside the bounds.
    #[default]
    Fit,
    /// Keep aspect ratio, cover the bounds.
    Fill,
    Stretch,
    /// No scaling, centred.
    Center,
}

/// One texture slot. `path` is relative to the control pack's assets dir.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextureConfig {
    pub path: String,
    pub enabled: bool,
    pub scale_mode: ScaleMode,
    pub opacity: f32,
    /// Inset as a fraction of the control size.
    pub padding: f32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            enabled: false,
            scale_mode: ScaleMode::Fit,
            opacity: 1.0,
            padding: 0.0,
        }
    }
}

impl TextureConfig {
    pub fn simple(path: &str) -> Self {
        Self {
            path: path.to_string(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Enabled and pointing at a file.
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.path.is_empty()
    }
}

/// Per-state button textures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonTextures {
    pub normal: TextureConfig,
    pub pressed: TextureConfig,
    pub toggled: TextureConfig,
    pub disabled: TextureConfig,
}

impl ButtonTextures {
    pub fn has_any_texture(&self) -> bool {
        self.normal.enabled || self.pressed.enabled || self.toggled.enabled || self.disabled.enabled
    }

    /// Texture for the current visual state: toggled, then pressed, then normal.
    pub fn for_state(&self, pressed: bool, toggled: bool) -> Option<&TextureConfig> {
        if toggled && self.toggled.enabled {
            Some(&self.toggled)
        } else if pressed && self.pressed.enabled {
            Some(&self.pressed)
        } else if self.normal.enabled {
            Some(&self.normal)
        } else {
            None
        }
    }
}

// ─── Common fields ───────────────────────────────────────────────────────

/// Fields shared by every control kind.
///
/// `x` is a fraction of the screen width; `y`, `width` and `height` are
/// fractions of the screen height so controls keep their aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlCommon {
    #[serde(default = "ControlId::generate_for_layout")]
    pub id: ControlId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Degrees, clockwise, about the control's own centre.
    pub rotation: f32,
    pub opacity: f32,
    pub border_opacity: f32,
    pub text_opacity: f32,
    pub text_color: Rgba,
    pub bg_color: Rgba,
    pub stroke_color: Rgba,
    /// dp
    pub stroke_width: f32,
    /// dp
    pub corner_radius: f32,
    pub is_visible: bool,
    /// Touches on this control are still forwarded to the game.
    pub is_pass_through: bool,
    pub is_size_ratio_locked: bool,
}

impl Default for ControlCommon {
    fn default() -> Self {
        Self {
            id: ControlId::default(),
            name: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.2,
            height: 0.2,
            rotation: 0.0,
            opacity: 0.35,
            border_opacity: 0.5,
            text_opacity: 0.9,
            text_color: Rgba(0xFFFF_FFFF),
            bg_color: Rgba(0xFF2A_2A2A),
            stroke_color: Rgba(0xFFAA_AAAA),
            stroke_width: 1.5,
            corner_radius: 8.0,
            is_visible: true,
            is_pass_through: false,
            is_size_ratio_locked: true,
        }
    }
}

// ─── Kind payloads ───────────────────────────────────────────────────────

/// How a control presents itself: keyboard styling, or gamepad styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonMode {
    #[default]
    Keyboard,
    Gamepad,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonData {
    pub mode: ButtonMode,
    pub keycode: KeyCode,
    /// Latching button: each press flips the state instead of pulsing it.
    pub is_toggle: bool,
    pub shape: ControlShape,
    pub polygon_points: PolygonPoints,
    pub texture: ButtonTextures,
    /// Touches on transparent texture pixels fall through.
    pub use_texture_alpha_hit_test: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoystickMode {
    #[default]
    Keyboard,
    Mouse,
    Gamepad,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JoystickData {
    pub stick_knob_size: f32,
    pub stick_opacity: f32,
    /// `[up, right, down, left]`
    pub joystick_keys: [KeyCode; 4],
    pub mode: JoystickMode,
    pub is_right_stick: bool,
}

impl Default for JoystickData {
    fn default() -> Self {
        Self {
            stick_knob_size: 0.4,
            stick_opacity: 0.7,
            joystick_keys: [
                KeyCode::KEYBOARD_W,
                KeyCode::KEYBOARD_D,
                KeyCode::KEYBOARD_S,
                KeyCode::KEYBOARD_A,
            ],
            mode: JoystickMode::Keyboard,
            is_right_stick: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TouchPadData {
    pub is_double_click_simulate_joystick: bool,
}

impl Default for TouchPadData {
    fn default() -> Self {
        Self {
            is_double_click_simulate_joystick: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WheelOrientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MouseWheelData {
    pub orientation: WheelOrientation,
    pub reverse_direction: bool,
    /// Pixels of travel per wheel tick.
    pub scroll_sensitivity: f32,
    pub scroll_ratio: f32,
}

impl Default for MouseWheelData {
    fn default() -> Self {
        Self {
            orientation: WheelOrientation::Vertical,
            reverse_direction: false,
            scroll_sensitivity: 40.0,
            scroll_ratio: 1.0,
        }
    }
}

/// Text labels only come in circle and rectangle outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextShape {
    #[default]
    Rectangle,
    Circle,
}

impl From<TextShape> for ControlShape {
    fn from(s: TextShape) -> Self {
        match s {
            TextShape::Rectangle => ControlShape::Rectangle,
            TextShape::Circle => ControlShape::Circle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextData {
    pub display_text: String,
    pub shape: TextShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DPadData {
    pub mode: ButtonMode,
    pub up_keycode: KeyCode,
    pub right_keycode: KeyCode,
    pub down_keycode: KeyCode,
    pub left_keycode: KeyCode,
    /// Fill of a pressed cell.
    pub active_color: Rgba,
}

impl Default for DPadData {
    fn default() -> Self {
        Self {
            mode: ButtonMode::Keyboard,
            up_keycode: KeyCode::KEYBOARD_W,
            right_keycode: KeyCode::KEYBOARD_D,
            down_keycode: KeyCode::KEYBOARD_S,
            left_keycode: KeyCode::KEYBOARD_A,
            active_color: Rgba(0xCCFF_FFFF),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialSector {
    pub keycode: KeyCode,
    pub label: String,
    /// Relative to the control pack's assets dir.
    pub icon_path: String,
}

impl RadialSector {
    pub fn new(keycode: KeyCode, label: &str) -> Self {
        Self {
            keycode,
            label: label.to_string(),
            icon_path: String::new(),
        }
    }

    /// `label`, or the key name when no label is set.
    pub fn caption(&self) -> String {
        if self.label.is_empty() {
            self.keycode.short_label()
        } else {
            self.label.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RadialMenuData {
    pub sector_count: u32,
    pub sectors: Vec<RadialSector>,
    /// Expanded radius as a multiple of the collapsed radius.
    pub expanded_scale: f32,
    /// Dead-zone radius as a fraction of the expanded radius, in [0, 1).
    pub dead_zone_ratio: f32,
    /// Milliseconds.
    pub expand_duration: u32,
    pub show_dividers: bool,
    pub divider_color: Rgba,
    pub selected_color: Rgba,
    #[serde(skip)]
    pub editor_preview_expanded: bool,
    #[serde(skip)]
    pub editor_selected_sector: Option<usize>,
}

impl Default for RadialMenuData {
    fn default() -> Self {
        let keys = [
            KeyCode::KEYBOARD_1,
            KeyCode::KEYBOARD_2,
            KeyCode::KEYBOARD_3,
            KeyCode::KEYBOARD_4,
            KeyCode::KEYBOARD_5,
            KeyCode::KEYBOARD_6,
            KeyCode::KEYBOARD_7,
            KeyCode::KEYBOARD_8,
        ];
        Self {
            sector_count: 8,
            sectors: keys
                .iter()
                .enumerate()
                .map(|(i, k)| RadialSector::new(*k, &(i + 1).to_string()))
                .collect(),
            expanded_scale: 2.5,
            dead_zone_ratio: 0.3,
            expand_duration: 150,
            show_dividers: true,
            divider_color: Rgba(0x66FF_FFFF),
            selected_color: Rgba(0x99FF_FFFF),
            editor_preview_expanded: false,
            editor_selected_sector: None,
        }
    }
}

// ─── ControlData ─────────────────────────────────────────────────────────

/// Kind-specific payload. The serialized `type` tag selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlKind {
    #[serde(rename = "button")]
    Button(ButtonData),
    #[serde(rename = "joystick")]
    Joystick(JoystickData),
    #[serde(rename = "dpad")]
    DPad(DPadData),
    #[serde(rename = "radialmenu")]
    RadialMenu(RadialMenuData),
    #[serde(rename = "text")]
    Text(TextData),
    #[serde(rename = "touchpad")]
    TouchPad(TouchPadData),
    #[serde(rename = "mousewheel")]
    MouseWheel(MouseWheelData),
}

impl ControlKind {
    pub fn name(&self) -> &'static str {
        match self {
            ControlKind::Button(_) => "button",
            ControlKind::Joystick(_) => "joystick",
            ControlKind::DPad(_) => "dpad",
            ControlKind::RadialMenu(_) => "radialmenu",
            ControlKind::Text(_) => "text",
            ControlKind::TouchPad(_) => "touchpad",
            ControlKind::MouseWheel(_) => "mousewheel",
        }
    }
}

/// One on-screen control: shared fields plus its kind payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlData {
    #[serde(flatten)]
    pub common: ControlCommon,
    #[serde(flatten)]
    pub kind: ControlKind,
}

impl ControlData {
    /// An unassigned id is replaced by a generated `<kind>_<n>` id.
    pub fn new(mut common: ControlCommon, kind: ControlKind) -> Self {
        if common.id.is_unassigned() {
            common.id = ControlId::generate(kind.name());
        }
        Self { common, kind }
    }

    pub fn button(data: ButtonData) -> Self {
        Self::new(ControlCommon::default(), ControlKind::Button(data))
    }

    pub fn dpad(data: DPadData) -> Self {
        Self::new(ControlCommon::default(), ControlKind::DPad(data))
    }

    pub fn radial_menu(data: RadialMenuData) -> Self {
        Self::new(ControlCommon::default(), ControlKind::RadialMenu(data))
    }

    pub fn text(data: TextData) -> Self {
        Self::new(ControlCommon::default(), ControlKind::Text(data))
    }

    pub fn id(&self) -> ControlId {
        self.common.id
    }

    /// Builder-style placement in screen fractions.
    pub fn at(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.common.x = x;
        self.common.y = y;
        self.common.width = width;
        self.common.height = height;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.common.name = name.to_string();
        self
    }

    /// Outline used for hit testing and fills.
    pub fn shape(&self) -> ControlShape {
        match &self.kind {
            ControlKind::Button(b) => b.shape,
            ControlKind::Text(t) => t.shape.into(),
            ControlKind::RadialMenu(_) | ControlKind::Joystick(_) | ControlKind::MouseWheel(_) => {
                ControlShape::Circle
            }
            ControlKind::DPad(_) | ControlKind::TouchPad(_) => ControlShape::Rectangle,
        }
    }

    pub fn as_button(&self) -> Option<&ButtonData> {
        match &self.kind {
            ControlKind::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_dpad(&self) -> Option<&DPadData> {
        match &self.kind {
            ControlKind::DPad(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_radial_menu(&self) -> Option<&RadialMenuData> {
        match &self.kind {
            ControlKind::RadialMenu(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_radial_menu_mut(&mut self) -> Option<&mut RadialMenuData> {
        match &mut self.kind {
            ControlKind::RadialMenu(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match &self.kind {
            ControlKind::Text(t) => Some(t),
            _ => None,
        }
    }
}
