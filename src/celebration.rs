use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

const PIECE_COUNT: usize = 100;
const SPREAD_DEGREES: f64 = 70.0;
/// Burst origin as a fraction of the screen height
const ORIGIN_Y: f64 = 0.6;
const GRAVITY: f64 = 12.0;

/// One scrap of confetti
#[derive(Debug, Clone)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiPiece {
    fn burst<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        // fan out upwards, centred on straight up
        let half = SPREAD_DEGREES.to_radians() / 2.0;
        let angle = -std::f64::consts::FRAC_PI_2 + rng.gen_range(-half..half);
        let speed = rng.gen_range(6.0..14.0);

        Self {
            x,
            y,
            // terminal cells are roughly twice as tall as wide
            vel_x: angle.cos() * speed * 2.0,
            vel_y: angle.sin() * speed,
            symbol: *['*', '+', '•', '✦', '▪', '◆', '~']
                .choose(rng)
                .unwrap_or(&'*'),
            color_index: rng.gen_range(0..7),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.vel_x *= 0.98;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti burst played once when every difference has been found
#[derive(Debug)]
pub struct Celebration {
    pub pieces: Vec<ConfettiPiece>,
    pub start_time: Instant,
    pub duration: f64, // seconds
    pub is_active: bool,
    pub width: f64,
    pub height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            start_time: Instant::now(),
            duration: 3.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.width = width as f64;
        self.height = height as f64;
        self.start_time = Instant::now();
        self.is_active = true;

        let origin_x = self.width / 2.0;
        let origin_y = self.height * ORIGIN_Y;
        self.pieces = (0..PIECE_COUNT)
            .map(|_| ConfettiPiece::burst(origin_x, origin_y, &mut rng))
            .collect();
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.pieces.clear();
    }

    pub fn update(&mut self) {
        if !self.is_active {
            return;
        }

        if self.start_time.elapsed().as_secs_f64() >= self.duration {
            self.stop();
            return;
        }

        let dt = 0.1; // Fixed timestep for animation
        let (width, height) = (self.width, self.height);
        self.pieces.retain_mut(|piece| {
            let alive = piece.update(dt);
            let buffer = 5.0;
            let off_screen =
                piece.y > height + buffer || piece.x < -buffer || piece.x > width + buffer;
            alive && !off_screen
        });
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}
