//! Builds the back-to-front draw list for one frame.
//!
//! Order: background, stars, then either the detail overlay or the overview
//! (sun, orbit rings, bodies, sidebar), and the sidebar toggle on top of all.

use crate::catalog::{Body, BodyId, Registry};
use crate::draw::{
    DrawCommand, DrawList, ImageKey, Point, Rect, Size, HIGHLIGHT, PANEL_BG, TOGGLE_BG, WHITE,
};
use crate::hit::{Layout, ICON_SIZE, SUN_SIZE};
use crate::orbit::{project, OrbitState};
use crate::stars::Star;
use crate::view::{interpolate_size, ViewState};

const FACT_TOP: f32 = 20.0;
const FACT_SPACING: f32 = 30.0;

/// Everything the compositor reads for one frame.
pub(crate) struct Scene<'a> {
    pub(crate) registry: &'a Registry,
    pub(crate) orbits: &'a OrbitState,
    pub(crate) view: &'a ViewState,
    pub(crate) stars: &'a [Star],
    pub(crate) layout: &'a Layout,
    pub(crate) t_ms: f64,
    pub(crate) hover: Option<BodyId>,
}

pub(crate) fn compose(scene: &Scene) -> DrawList {
    let l = scene.layout;
    let mut out = DrawList::with_capacity(scene.stars.len() + scene.registry.len() * 4 + 16);

    out.image(
        ImageKey::Background,
        l.center(),
        Size { w: l.width as f32, h: l.height as f32 },
    );

    for s in scene.stars {
        out.push(DrawCommand::Point {
            position: Point::new(s.x as f32, s.y as f32),
            color: WHITE.with_alpha(s.alpha(scene.t_ms)),
            radius: s.radius,
        });
    }

    match scene.view.selected() {
        Some(body) => detail_overlay(&mut out, scene, body),
        None => {
            overview(&mut out, scene);
            if scene.view.sidebar_visible() {
                sidebar(&mut out, scene);
            }
        }
    }

    toggle_control(&mut out, l.toggle);
    out
}

fn overview(out: &mut DrawList, scene: &Scene) {
    let center = scene.layout.center();
    out.image(ImageKey::Sun, center, Size::square(SUN_SIZE));

    for (_, b) in scene.registry.iter() {
        out.push(DrawCommand::CircleOutline { center, radius: b.orbit_radius, color: WHITE });
    }

    for (id, b) in scene.registry.iter() {
        let p = project(center, b.orbit_radius, scene.orbits.angle(id));
        let p = Point::new(p.x.trunc(), p.y.trunc());
        out.image(ImageKey::Orbit(id), p, b.draw_size(b.base_size));
    }
}

fn sidebar(out: &mut DrawList, scene: &Scene) {
    let l = scene.layout;
    out.rect(l.sidebar_rect(), PANEL_BG, 0.0);

    for (id, b) in scene.registry.iter() {
        let y = l.row_anchor(id.0) as f32;
        if scene.hover == Some(id) {
            out.rect(l.row_rect(id.0), HIGHLIGHT, 10.0);
        }
        // icon box has its top-left corner at (20, y - 5)
        out.image(
            ImageKey::Icon(id),
            Point::new(20.0 + ICON_SIZE / 2.0, y - 5.0 + ICON_SIZE / 2.0),
            Size::square(ICON_SIZE),
        );
        out.text(b.name.clone(), 70.0, y, WHITE);
    }
}

fn detail_overlay(out: &mut DrawList, scene: &Scene, id: BodyId) {
    let l = scene.layout;
    let body = scene.registry.get(id);

    let size = interpolate_size(body.base_size, l.expanded_size(), scene.view.progress()).round();
    out.image(ImageKey::Expanded(id), l.center(), body.draw_size(size));

    let panel = l.detail_panel_rect();
    out.rect(panel, PANEL_BG, 0.0);
    for (i, line) in fact_lines(body).into_iter().enumerate() {
        out.text(line, (panel.x + 10) as f32, FACT_TOP + i as f32 * FACT_SPACING, WHITE);
    }
}

pub(crate) fn fact_lines(body: &Body) -> [String; 3] {
    [
        format!("Name: {}", body.name),
        format!("Size: {} km", body.diameter_km),
        format!("Satellites: {}", body.satellite_count),
    ]
}

/// Rounded button with three horizontal bars.
fn toggle_control(out: &mut DrawList, r: Rect) {
    out.rect(r, TOGGLE_BG, 10.0);
    for i in 0..3 {
        let y = r.y + 12 + i * 8;
        out.rect(Rect::new(r.x + 15, y - 1, 20, 3), WHITE, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::generate;
    use crate::view::{Action, DEFAULT_EXPAND_STEP};
    use rand::{rngs::StdRng, SeedableRng};

    struct Fixture {
        registry: Registry,
        orbits: OrbitState,
        stars: Vec<Star>,
        layout: Layout,
    }

    fn fixture() -> Fixture {
        let registry = Registry::builtin(350).unwrap();
        let orbits = OrbitState::new(vec![0.0; registry.len()]);
        let stars = generate(5, 1365, 780, &mut StdRng::seed_from_u64(3));
        Fixture { registry, orbits, stars, layout: Layout::new(1365, 780, 200) }
    }

    fn draw(f: &Fixture, view: &ViewState, hover: Option<BodyId>) -> DrawList {
        compose(&Scene {
            registry: &f.registry,
            orbits: &f.orbits,
            view,
            stars: &f.stars,
            layout: &f.layout,
            t_ms: 0.0,
            hover,
        })
    }

    fn images(list: &DrawList) -> Vec<ImageKey> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { key, .. } => Some(*key),
                _ => None,
            })
            .collect()
    }

    fn texts(list: &DrawList) -> Vec<String> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn overview_draw_order() {
        let f = fixture();
        let view = ViewState::new(DEFAULT_EXPAND_STEP);
        let list = draw(&f, &view, None);
        let cmds = list.commands();

        assert!(matches!(cmds[0], DrawCommand::Image { key: ImageKey::Background, .. }));
        for c in &cmds[1..6] {
            assert!(matches!(c, DrawCommand::Point { .. }));
        }
        assert!(matches!(cmds[6], DrawCommand::Image { key: ImageKey::Sun, .. }));
        for c in &cmds[7..16] {
            assert!(matches!(c, DrawCommand::CircleOutline { color: WHITE, .. }));
        }
        let keys = images(&list);
        assert_eq!(keys[2..11], (0..9).map(|i| ImageKey::Orbit(BodyId(i))).collect::<Vec<_>>()[..]);
        assert_eq!(keys[11..], (0..9).map(|i| ImageKey::Icon(BodyId(i))).collect::<Vec<_>>()[..]);

        // toggle: rounded button and three bars, last
        let tail = &cmds[cmds.len() - 4..];
        assert!(matches!(tail[0], DrawCommand::FilledRect { color: TOGGLE_BG, corner_radius, .. } if corner_radius == 10.0));
        for c in &tail[1..] {
            assert!(matches!(c, DrawCommand::FilledRect { color: WHITE, .. }));
        }
    }

    #[test]
    fn bodies_sit_on_their_rings_with_aspect() {
        let f = fixture();
        let view = ViewState::new(DEFAULT_EXPAND_STEP);
        let list = draw(&f, &view, None);
        let saturn = f.registry.find("Saturn").unwrap();
        let cmd = list
            .commands()
            .iter()
            .find(|c| matches!(c, DrawCommand::Image { key: ImageKey::Orbit(id), .. } if *id == saturn))
            .unwrap();
        match cmd {
            DrawCommand::Image { center, size, .. } => {
                // angle 0 is straight right of the sun
                assert_eq!(*center, Point::new(682.0 + 275.0, 390.0));
                assert_eq!(*size, Size { w: 100.0, h: 50.0 });
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn hidden_sidebar_is_not_drawn() {
        let f = fixture();
        let view = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::ToggleSidebar);
        let list = draw(&f, &view, None);
        assert!(texts(&list).is_empty());
        assert!(!images(&list).iter().any(|k| matches!(k, ImageKey::Icon(_))));
        // toggle is still there
        assert!(matches!(list.commands().last(), Some(DrawCommand::FilledRect { color: WHITE, .. })));
    }

    #[test]
    fn hover_highlights_row() {
        let f = fixture();
        let view = ViewState::new(DEFAULT_EXPAND_STEP);
        let list = draw(&f, &view, Some(BodyId(3)));
        let hl: Vec<_> = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FilledRect { color: HIGHLIGHT, .. }))
            .collect();
        assert_eq!(
            hl,
            vec![&DrawCommand::FilledRect { rect: f.layout.row_rect(3), color: HIGHLIGHT, corner_radius: 10.0 }]
        );
    }

    #[test]
    fn detail_replaces_overview() {
        let f = fixture();
        let earth = BodyId(3);
        let mut view = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(earth));
        for _ in 0..50 {
            view = view.tick();
        }
        let list = draw(&f, &view, None);
        let keys = images(&list);
        assert_eq!(keys, vec![ImageKey::Background, ImageKey::Expanded(earth)]);
        assert!(!list.commands().iter().any(|c| matches!(c, DrawCommand::CircleOutline { .. })));
        assert_eq!(texts(&list), vec!["Name: Earth", "Size: 12742 km", "Satellites: 1"]);

        let size = list.commands().iter().find_map(|c| match c {
            DrawCommand::Image { key: ImageKey::Expanded(_), size, .. } => Some(*size),
            _ => None,
        });
        assert_eq!(size, Some(Size::square(624.0)));
    }

    #[test]
    fn transition_interpolates_size() {
        let f = fixture();
        let saturn = f.registry.find("Saturn").unwrap();
        let mut view = ViewState::new(DEFAULT_EXPAND_STEP).apply(Action::SelectBody(saturn));
        for _ in 0..25 {
            view = view.tick();
        }
        let list = draw(&f, &view, None);
        let size = list.commands().iter().find_map(|c| match c {
            DrawCommand::Image { key: ImageKey::Expanded(_), size, .. } => Some(*size),
            _ => None,
        });
        // 50 + (624 - 50) * 0.5
        assert_eq!(size, Some(Size { w: 674.0, h: 337.0 }));
    }
}
