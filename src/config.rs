// World size in logical pixels. The terminal presenter scales this onto cells.
pub const WIDTH: i32 = 800;
pub const HEIGHT: i32 = 600;
pub const FPS: u32 = 60;

pub const WHITE: (u8, u8, u8) = (255, 255, 255);
pub const DEFAULT_BG_COLOR: (u8, u8, u8) = (30, 30, 30);

// Firework palette, picked uniformly per launch
pub const FIREWORK_COLORS: [(u8, u8, u8); 8] = [
    (255, 100, 100), // Red
    (100, 255, 100), // Green
    (100, 100, 255), // Blue
    (255, 255, 100), // Yellow
    (255, 100, 255), // Magenta
    (100, 255, 255), // Cyan
    (255, 200, 100), // Orange
    (200, 100, 255), // Purple
];

// Sprite cache
pub const CANONICAL_SIZES: [u32; 6] = [20, 25, 30, 35, 40, 45];
pub const NEAR_HIT_TOLERANCE: u32 = 5;
pub const PLACEHOLDER_HEART: [u8; 4] = [255, 182, 203, 255];
pub const PLACEHOLDER_FACE: [u8; 4] = [255, 0, 0, 255];

// Physics, in units per tick
pub const GRAVITY: f32 = 0.1;
pub const AIR_DAMPING: f32 = 0.99;
pub const LAUNCH_SPEED_FACTOR: f32 = 0.02;
pub const ARRIVAL_TOLERANCE: f32 = 10.0;
pub const COLOR_JITTER: i32 = 30;

// Launch area
pub const LAUNCH_MARGIN: i32 = 50;
pub const TARGET_MARGIN: i32 = 100;
pub const TARGET_TOP: i32 = 50;

// Character animation
pub const ANIMATION_DURATION_MS: u64 = 600;
pub const BOUNCE_AMPLITUDE: f32 = 50.0;
pub const PEAK_SCALE: f32 = 1.2;
pub const FACE_SIZE: u32 = 64;

pub const TEXT_KWIMI: &str = "Grogu is so cutie";
pub const TEXT_GROGU: &str = "Kwomiiiii";

pub const HEART_IMAGE_PATH: &str = "assets/heart.png";
pub const FACE_IMAGE_PATH: &str = "assets/derp.png";

// Input repetition, in consecutive held ticks
pub const SINGLE_KEY_REPEAT: u32 = 8;
pub const COMBO_REPEAT: u32 = 4;
// Without release events a key is dropped after this many silent ticks
pub const HOLD_TICKS: u32 = 40;
// Same, for a key that has not auto-repeated yet. Shorter than either repeat period.
pub const TAP_TICKS: u32 = 3;
