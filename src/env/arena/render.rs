//! Software rasterizer for the arena
//!
//! Produces a row-major RGB frame of the whole scene: the arena with every
//! entity drawn as a filled circle, a side panel with HUD text, and the
//! transient death fade-out / win celebration overlays. Windowing is an
//! external concern; collaborators either blit this buffer or consume
//! [`GameView`](super::types::GameView) and draw their own.

use super::config::ArenaConfig;
use super::types::{GameView, PowerUpKind};

/// Width of the side panel reserved for HUD text, in pixels
pub const HUD_PANEL_WIDTH: usize = 150;

const ARENA_BG: [u8; 3] = [15, 15, 20];
const PANEL_BG: [u8; 3] = [10, 10, 10];
const PLAYER_COLOR: [u8; 3] = [0, 200, 0];
const ENEMY_COLOR: [u8; 3] = [200, 0, 0];
const BULLET_COLOR: [u8; 3] = [255, 255, 0];
const BULLET_BOOSTED_COLOR: [u8; 3] = [255, 120, 0];
const SPEED_POWERUP_COLOR: [u8; 3] = [0, 255, 255];
const DAMAGE_POWERUP_COLOR: [u8; 3] = [255, 0, 255];
const HUD_TEXT_COLOR: [u8; 3] = [255, 255, 255];
const DEATH_TEXT_COLOR: [u8; 3] = [255, 80, 80];
const WIN_TEXT_COLOR: [u8; 3] = [255, 255, 100];

/// Displayed bullet radius; larger than the collision radius so shots stay
/// visible at arena scale
const BULLET_DRAW_RADIUS: i32 = 4;
const POWERUP_DRAW_RADIUS: i32 = 6;
const CONFETTI_DRAW_RADIUS: i32 = 3;

/// Frame dimensions (width, height) in pixels for a given arena
pub fn frame_dims(arena: &ArenaConfig) -> (usize, usize) {
    (arena.width.round() as usize + HUD_PANEL_WIDTH, arena.height.round() as usize)
}

/// Rasterize a frame into a row-major RGB buffer of `frame_dims` pixels
pub fn rasterize(view: &GameView, arena: &ArenaConfig) -> Vec<u8> {
    let (width, height) = frame_dims(arena);
    let arena_width = arena.width.round() as usize;
    let mut buf = vec![0_u8; width * height * 3];

    // Backgrounds: world area, then the HUD panel
    for y in 0..height {
        for x in 0..width {
            let color = if x < arena_width { ARENA_BG } else { PANEL_BG };
            put_pixel(&mut buf, width, x, y, color);
        }
    }

    // Player
    let player = &view.snapshot.player;
    fill_circle(
        &mut buf,
        width,
        height,
        player.x as i32,
        player.y as i32,
        arena.player_radius.round() as i32,
        PLAYER_COLOR,
    );

    // Enemies (snapshot holds live ones only)
    for enemy in &view.snapshot.enemies {
        fill_circle(
            &mut buf,
            width,
            height,
            enemy.x as i32,
            enemy.y as i32,
            arena.enemy_radius.round() as i32,
            ENEMY_COLOR,
        );
    }

    // Bullets shift color while the damage boost is active
    let bullet_color = if view.damage_boost { BULLET_BOOSTED_COLOR } else { BULLET_COLOR };
    for bullet in &view.snapshot.bullets {
        fill_circle(
            &mut buf,
            width,
            height,
            bullet.x as i32,
            bullet.y as i32,
            BULLET_DRAW_RADIUS,
            bullet_color,
        );
    }

    // Power-ups
    for powerup in &view.powerups {
        let color = match powerup.kind {
            PowerUpKind::Speed => SPEED_POWERUP_COLOR,
            PowerUpKind::Damage => DAMAGE_POWERUP_COLOR,
        };
        fill_circle(
            &mut buf,
            width,
            height,
            powerup.x as i32,
            powerup.y as i32,
            POWERUP_DRAW_RADIUS,
            color,
        );
    }

    // HUD text column
    let boosts = match (view.damage_boost, view.speed_boost) {
        (true, true) => "DMG SPD",
        (true, false) => "DMG",
        (false, true) => "SPD",
        (false, false) => "NONE",
    };
    let lines = [
        format!("SCORE {}", view.score as i32),
        format!("KILLS {}", view.kills),
        format!("BOOST {boosts}"),
        format!("STEP {}", view.snapshot.steps),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(&mut buf, width, height, arena_width + 10, 30 + i * 25, line, HUD_TEXT_COLOR, 1);
    }

    // Win celebration: confetti under the banner
    if view.won {
        for c in &view.confetti {
            fill_circle(
                &mut buf,
                width,
                height,
                c.x as i32,
                c.y as i32,
                CONFETTI_DRAW_RADIUS,
                c.color,
            );
        }
        draw_text_centered(&mut buf, width, height, arena_width / 2, height / 2, "YOU WON", WIN_TEXT_COLOR, 2);
    }

    // Death fade-out
    if view.death_fade > 0.0 {
        let fade = view.death_fade;
        let color = [
            (DEATH_TEXT_COLOR[0] as f32 * fade) as u8,
            (DEATH_TEXT_COLOR[1] as f32 * fade) as u8,
            (DEATH_TEXT_COLOR[2] as f32 * fade) as u8,
        ];
        draw_text_centered(&mut buf, width, height, arena_width / 2, height / 2, "YOU DIED", color, 2);
    }

    buf
}

fn put_pixel(buf: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 3]) {
    let idx = (y * width + x) * 3;
    buf[idx..idx + 3].copy_from_slice(&color);
}

fn fill_circle(
    buf: &mut [u8],
    width: usize,
    height: usize,
    cx: i32,
    cy: i32,
    radius: i32,
    color: [u8; 3],
) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let x = cx + dx;
            let y = cy + dy;
            if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
                put_pixel(buf, width, x as usize, y as usize, color);
            }
        }
    }
}

// 5x7 bitmap glyphs, one u8 per row, the low 5 bits used (MSB of the 5 is
// the leftmost column). Covers the characters the HUD and banners need.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        _ => [0; 7],
    }
}

fn draw_text(
    buf: &mut [u8],
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    text: &str,
    color: [u8; 3],
    scale: usize,
) {
    let advance = 6 * scale; // 5 columns + 1 spacing
    for (i, c) in text.chars().enumerate() {
        let rows = glyph(c);
        let gx = x + i * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..5 {
                if bits & (0b10000 >> col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = gx + col * scale + sx;
                        let py = y + row * scale + sy;
                        if px < width && py < height {
                            put_pixel(buf, width, px, py, color);
                        }
                    }
                }
            }
        }
    }
}

fn draw_text_centered(
    buf: &mut [u8],
    width: usize,
    height: usize,
    cx: usize,
    cy: usize,
    text: &str,
    color: [u8; 3],
    scale: usize,
) {
    let text_width = text.chars().count() * 6 * scale;
    let text_height = 7 * scale;
    let x = cx.saturating_sub(text_width / 2);
    let y = cy.saturating_sub(text_height / 2);
    draw_text(buf, width, height, x, y, text, color, scale);
}
