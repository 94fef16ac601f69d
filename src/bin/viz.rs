use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints, Points};
use rand::Rng;

use planar_quadrotor::control::{CostWeights, GoalHandle, LqrConfig, LqrController};
use planar_quadrotor::dynamics::state::{hover_at, Input, Params, SimConfig, State, THETA, X, Y};
use planar_quadrotor::sim::observer::{rotor_positions, screen_to_world, tone_volume, world_to_screen};
use planar_quadrotor::sim::{PlanarQuadrotor, PlotWorker, Simulation, TrajectorySnapshot};

const SCREEN_WIDTH: f32 = 1280.0;
const SCREEN_HEIGHT: f32 = 720.0;
const BODY_HALF_WIDTH: f64 = 40.0; // px
const MAX_TICKS_PER_FRAME: usize = 500;
const HISTORY_LIMIT: usize = 100_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let params = Params::default();
    let config = SimConfig::default();

    let mut rng = rand::thread_rng();
    let half_w = f64::from(SCREEN_WIDTH) / 2.0;
    let half_h = f64::from(SCREEN_HEIGHT) / 2.0;
    let initial = hover_at(rng.gen_range(-half_w..=half_w), rng.gen_range(-half_h..=half_h));
    log::info!("Initial position: ({:.0}, {:.0})", initial[X], initial[Y]);

    let controller =
        LqrController::from_params(&params, config.dt, &CostWeights::default(), &LqrConfig::default())?;
    let quadrotor = PlanarQuadrotor::new(initial, params)?;
    let sim = Simulation::new(quadrotor, controller, config)?.with_history_limit(HISTORY_LIMIT);
    let goal = sim.goal_handle();

    // Plot series are prepared off the UI thread from a frozen copy of the history
    let plotter = PlotWorker::spawn(|snapshot: &TrajectorySnapshot| {
        snapshot
            .decimated(4_000)
            .iter()
            .map(|s| [s.x, s.y])
            .collect::<Vec<[f64; 2]>>()
    })?;

    let app = QuadrotorViz {
        sim,
        goal,
        plotter,
        plot: None,
        plot_open: false,
        pending_time: 0.0,
        last_input: Input::zeros(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([SCREEN_WIDTH, SCREEN_HEIGHT]),
        ..Default::default()
    };
    eframe::run_native("Planar Quadrotor", options, Box::new(|_| Ok(Box::new(app))))?;
    Ok(())
}

struct QuadrotorViz {
    sim: Simulation<LqrController>,
    goal: GoalHandle,
    plotter: PlotWorker<Vec<[f64; 2]>>,
    plot: Option<Vec<[f64; 2]>>,
    plot_open: bool,
    pending_time: f64,
    last_input: Input,
}

impl QuadrotorViz {
    /// Run as many ticks as the elapsed wall-clock time covers.
    fn advance(&mut self, elapsed: f64) {
        let dt = self.sim.config().dt;
        self.pending_time += elapsed;
        let mut ticks = 0;
        while self.pending_time >= dt && ticks < MAX_TICKS_PER_FRAME {
            match self.sim.tick() {
                Ok(tick) => self.last_input = tick.input,
                Err(e) => {
                    log::error!("Simulation step failed: {}", e);
                    break;
                }
            }
            self.pending_time -= dt;
            ticks += 1;
        }
        if ticks == MAX_TICKS_PER_FRAME {
            // Fell behind real time; drop the backlog instead of spiralling
            self.pending_time = 0.0;
        }
    }
}

/// Draw the vehicle and the goal marker from a read-only view of the state.
fn render(painter: &egui::Painter, rect: egui::Rect, state: &State, goal: &State) {
    let (w, h) = (f64::from(rect.width()), f64::from(rect.height()));
    let to_screen = |x: f64, y: f64| {
        let (sx, sy) = world_to_screen(x, y, w, h);
        rect.min + egui::vec2(sx as f32, sy as f32)
    };

    painter.rect_filled(rect, 0.0, egui::Color32::from_rgb(0x3E, 0x78, 0xB2));

    let g = to_screen(goal[X], goal[Y]);
    let cross = egui::Stroke::new(2.0, egui::Color32::WHITE);
    painter.line_segment([g - egui::vec2(8.0, 0.0), g + egui::vec2(8.0, 0.0)], cross);
    painter.line_segment([g - egui::vec2(0.0, 8.0), g + egui::vec2(0.0, 8.0)], cross);

    let [r1, r2] = rotor_positions(state, BODY_HALF_WIDTH);
    let (p1, p2) = (to_screen(r1.0, r1.1), to_screen(r2.0, r2.1));
    painter.line_segment([p1, p2], egui::Stroke::new(6.0, egui::Color32::from_gray(30)));
    for p in [p1, p2] {
        painter.circle_filled(p, 10.0, egui::Color32::from_rgb(0xFF, 0x00, 0x00));
    }
    painter.circle_filled(to_screen(state[X], state[Y]), 6.0, egui::Color32::from_gray(30));
}

impl eframe::App for QuadrotorViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let elapsed = f64::from(ctx.input(|i| i.stable_dt));
        self.advance(elapsed);

        if let Some(points) = self.plotter.poll() {
            self.plot = Some(points);
            self.plot_open = true;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::P)) && !self.plotter.is_busy() {
            log::info!("Plotting {} samples", self.sim.history().len());
            self.plotter.request(self.sim.snapshot());
        }

        let state = self.sim.state();
        let goal = self.goal.get();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.label(format!(
                "t = {:.1} s  |  x = {:.1}  y = {:.1}  theta = {:.3} rad  |  goal ({:.0}, {:.0})  |  u = ({:.2}, {:.2}) N  |  tone {:.1}  |  click: set goal, P: plot",
                self.sim.time(),
                state[X],
                state[Y],
                state[THETA],
                goal[X],
                goal[Y],
                self.last_input[0],
                self.last_input[1],
                tone_volume(&self.last_input),
            ));
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click());
                let rect = response.rect;

                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        let local = pos - rect.min;
                        let (x, y) = screen_to_world(
                            f64::from(local.x),
                            f64::from(local.y),
                            f64::from(rect.width()),
                            f64::from(rect.height()),
                        );
                        self.goal.set_state(hover_at(x, y));
                    }
                }

                render(&painter, rect, &state, &goal);
            });

        if let Some(points) = &self.plot {
            let mut open = self.plot_open;
            egui::Window::new("Trajectory")
                .open(&mut open)
                .default_size([600.0, 400.0])
                .show(ctx, |ui| {
                    let line: PlotPoints = points.iter().copied().collect();
                    let start: PlotPoints = points.iter().take(1).copied().collect();
                    Plot::new("xy")
                        .x_axis_label("x")
                        .y_axis_label("y")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Path", line));
                            plot_ui.points(Points::new("Start", start).radius(4.0));
                        });
                });
            self.plot_open = open;
        }

        ctx.request_repaint();
    }
}
