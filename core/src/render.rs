use crate::*;

/// Default on-screen size of one board cell, in CSS pixels.
pub const DEFAULT_CELL_SIZE: u32 = 22;

/// Pixel size of a square canvas holding a `grid_size` board.
pub const fn canvas_size(grid_size: Coord, cell_size: u32) -> u32 {
    grid_size as u32 * cell_size
}

/// Minimal drawing backend, in pixels. Colors are CSS color strings.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64, color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub grid: &'static str,
    pub food: &'static str,
    pub head: &'static str,
    pub body: &'static str,
    pub eye: &'static str,
    pub pupil: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#1a1a2e",
            grid: "rgba(255, 255, 255, 0.05)",
            food: "#ff6b6b",
            head: "#4facfe",
            body: "#636efa",
            eye: "#fff",
            pupil: "#000",
        }
    }
}

/// Paints `snapshot` onto `surface`. Read-only on the game state, valid in every phase.
pub fn draw(snapshot: &Snapshot, surface: &mut impl Surface, palette: &Palette, cell_size: f64) {
    let cell = cell_size.max(1.);
    let extent = f64::from(snapshot.grid_size) * cell;

    surface.clear(extent, extent, palette.background);

    for i in 0..=snapshot.grid_size as u32 {
        let offset = f64::from(i) * cell;
        surface.line((offset, 0.), (offset, extent), palette.grid);
        surface.line((0., offset), (extent, offset), palette.grid);
    }

    let (food_x, food_y) = cell_origin(snapshot.food, cell);
    surface.fill_circle(
        food_x + cell / 2.,
        food_y + cell / 2.,
        (cell / 2. - 2.).max(1.),
        palette.food,
    );

    let inset = if cell > 6. { 2. } else { 0. };
    for &segment in snapshot.snake.iter().skip(1) {
        let (x, y) = cell_origin(segment, cell);
        surface.fill_rect(x + inset, y + inset, cell - 2. * inset, cell - 2. * inset, palette.body);
    }

    // head last so it stays on top
    if let Some(head) = snapshot.head() {
        let (x, y) = cell_origin(head, cell);
        surface.fill_rect(x + inset, y + inset, cell - 2. * inset, cell - 2. * inset, palette.head);

        let eye_radius = (cell * 0.14).max(1.);
        for eye_x in [0.35, 0.65] {
            let (cx, cy) = (x + cell * eye_x, y + cell * 0.35);
            surface.fill_circle(cx, cy, eye_radius, palette.eye);
            surface.fill_circle(cx, cy, eye_radius / 2., palette.pupil);
        }
    }
}

fn cell_origin((x, y): Cell, cell_size: f64) -> (f64, f64) {
    (f64::from(x) * cell_size, f64::from(y) * cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(f64, f64),
        Rect(f64, f64, f64, f64, String),
        Circle(f64, f64, String),
        Line,
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl Surface for Recorder {
        fn clear(&mut self, width: f64, height: f64, _color: &str) {
            self.0.push(Op::Clear(width, height));
        }

        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
            self.0.push(Op::Rect(x, y, width, height, color.to_string()));
        }

        fn fill_circle(&mut self, cx: f64, cy: f64, _radius: f64, color: &str) {
            self.0.push(Op::Circle(cx, cy, color.to_string()));
        }

        fn line(&mut self, _from: (f64, f64), _to: (f64, f64), _color: &str) {
            self.0.push(Op::Line);
        }
    }

    fn snapshot(phase: Phase, snake: Vec<Cell>) -> Snapshot {
        Snapshot {
            grid_size: 10,
            snake,
            food: (7, 2),
            direction: Direction::Right,
            pending: None,
            score: 0,
            high_score: 0,
            tick_interval_ms: 150,
            phase,
        }
    }

    #[test]
    fn canvas_matches_board() {
        assert_eq!(canvas_size(20, 20), 400);
        assert_eq!(canvas_size(18, DEFAULT_CELL_SIZE), 396);
    }

    #[test]
    fn draws_board_food_and_snake() {
        let palette = Palette::default();
        let mut surface = Recorder::default();
        draw(
            &snapshot(Phase::Running, vec![(3, 1), (2, 1), (1, 1)]),
            &mut surface,
            &palette,
            20.,
        );

        assert_eq!(surface.0[0], Op::Clear(200., 200.));
        let lines = surface.0.iter().filter(|op| **op == Op::Line).count();
        assert_eq!(lines, 22);
        assert!(surface.0.contains(&Op::Circle(150., 50., palette.food.to_string())));

        let rects: Vec<_> = surface
            .0
            .iter()
            .filter_map(|op| match op {
                Op::Rect(x, y, _, _, color) => Some((*x, *y, color.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            rects,
            vec![
                (42., 22., palette.body),
                (22., 22., palette.body),
                (62., 22., palette.head),
            ]
        );
    }

    #[test]
    fn draws_idle_and_game_over_frames() {
        let palette = Palette::default();
        for phase in [Phase::Idle, Phase::GameOver] {
            let mut surface = Recorder::default();
            draw(&snapshot(phase, vec![(0, 0)]), &mut surface, &palette, 22.);
            assert!(!surface.0.is_empty());
        }

        let mut surface = Recorder::default();
        draw(&snapshot(Phase::Idle, Vec::new()), &mut surface, &palette, 22.);
        assert!(!surface.0.iter().any(|op| matches!(op, Op::Rect(..))));
    }
}
