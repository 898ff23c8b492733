use crate::catalog::Registry;
use crate::compose::{compose, Scene};
use crate::draw::DrawList;
use crate::hit::{hit_test, hover_row, Layout};
use crate::orbit::OrbitState;
use crate::stars::{self, Star};
use crate::view::{Action, ViewState};
use rand::{rngs::StdRng, SeedableRng};

/// Per-frame input, already mapped to logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct FrameInput {
    pub(crate) pointer: (i32, i32),
    pub(crate) click: Option<(i32, i32)>,
    /// milliseconds since start
    pub(crate) t_ms: f64,
}

/// All simulation state owned by the frame loop.
pub(crate) struct Simulation {
    pub(crate) registry: Registry,
    pub(crate) layout: Layout,
    pub(crate) orbits: OrbitState,
    pub(crate) view: ViewState,
    pub(crate) stars: Vec<Star>,
}

impl Simulation {
    /// Star placement and starting angles both come from `seed`.
    pub(crate) fn new(registry: Registry, layout: Layout, star_count: usize, expand_step: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let orbits = OrbitState::random(&registry, &mut rng);
        let stars = stars::generate(star_count, layout.width, layout.height, &mut rng);
        Self {
            registry,
            layout,
            orbits,
            view: ViewState::new(expand_step),
            stars,
        }
    }

    /// One frame: advance, draw what is on screen, then resolve the click
    /// against that picture.
    pub(crate) fn frame(&mut self, input: &FrameInput) -> (DrawList, Action) {
        self.view = self.view.tick();
        self.orbits.advance(&self.registry, self.view.motion_enabled());

        let hover = hover_row(input.pointer, &self.view, &self.layout, self.registry.len());
        let list = compose(&Scene {
            registry: &self.registry,
            orbits: &self.orbits,
            view: &self.view,
            stars: &self.stars,
            layout: &self.layout,
            t_ms: input.t_ms,
            hover,
        });

        let action = match input.click {
            Some(p) => hit_test(p, true, &self.view, &self.layout, self.registry.len()),
            None => Action::None,
        };
        self.view = self.view.apply(action);
        (list, action)
    }
}
