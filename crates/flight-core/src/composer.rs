//! Scene content gating for the renderer.
//!
//! The composer holds no timers. It mirrors what the [`TransitionMachine`]
//! reports each frame and answers which groups the renderer may draw, which
//! clicks count, and where the decorative leaves sit.

use fnv::FnvHashMap;
use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::constants::{
    vec3, DEFAULT_LEAF_POSITIONS, HOLOGRAM_SCALE_EXPANDED, HOLOGRAM_SCALE_HOVERED,
    MAX_FRAME_DT, MEMBER_SCALE_HOVERED, WANDER_HEIGHT_MIN, WANDER_HEIGHT_SPAN,
    WANDER_INTERVAL_SEC, WANDER_LIMIT, WANDER_STEP,
};
use crate::selection::{Section, Selection};
use crate::transition::{TransitionComplete, TransitionMachine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneGroup {
    /// Grid, lights and wandering leaves; always drawn.
    Backdrop,
    ProjectHolograms,
    TeamConstellation,
    ContactGlobe,
    /// The particle tunnel.
    SpaceTravel,
}

impl SceneGroup {
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::Projects => SceneGroup::ProjectHolograms,
            Section::About => SceneGroup::TeamConstellation,
            Section::Contact => SceneGroup::ContactGlobe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SceneGroup::Backdrop => "backdrop",
            SceneGroup::ProjectHolograms => "project-holograms",
            SceneGroup::TeamConstellation => "team-constellation",
            SceneGroup::ContactGlobe => "contact-globe",
            SceneGroup::SpaceTravel => "space-travel",
        }
    }
}

pub type ElementId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Project,
    TeamMember,
}

impl ElementKind {
    fn section(&self) -> Section {
        match self {
            ElementKind::Project => Section::Projects,
            ElementKind::TeamMember => Section::About,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct ElementState {
    hovered: bool,
    expanded: bool,
}

#[derive(Clone, Copy, Debug)]
struct Element {
    kind: ElementKind,
    state: ElementState,
}

/// Result of a click that the composer accepted. Team members only react
/// to hover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementEvent {
    ProjectToggled { id: ElementId, expanded: bool },
}

/// Grid walk of the backdrop leaves, advanced one step per
/// [`WANDER_INTERVAL_SEC`] of page time.
#[derive(Clone, Debug)]
struct Wander {
    elapsed: f64,
    step: u64,
    leaves: Vec<Vec3>,
}

impl Wander {
    fn new() -> Self {
        Self {
            elapsed: 0.0,
            step: 0,
            leaves: DEFAULT_LEAF_POSITIONS.iter().map(|p| vec3(*p)).collect(),
        }
    }

    fn advance(&mut self, seed: u64, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.elapsed += dt.min(MAX_FRAME_DT) as f64;
        let due = (self.elapsed / WANDER_INTERVAL_SEC as f64).floor() as u64;
        while self.step < due {
            self.step += 1;
            for (i, leaf) in self.leaves.iter_mut().enumerate() {
                *leaf = wander_step(seed, i, self.step, *leaf);
            }
        }
    }
}

pub struct SceneComposer {
    selection: Selection,
    /// Section whose geometry was mounted when the camera last came to rest.
    shown: Section,
    /// Latched once a flight leaves `shown`; cleared on arrival.
    hidden_in_flight: bool,
    transitioning: bool,
    tunnel_visible: bool,
    user_control: bool,
    elements: FnvHashMap<ElementId, Element>,
    seed: u64,
    wander: Wander,
}

impl SceneComposer {
    pub fn new(selection: Selection, seed: u64) -> Self {
        Self {
            selection,
            shown: selection.section,
            hidden_in_flight: false,
            transitioning: false,
            tunnel_visible: false,
            user_control: true,
            elements: FnvHashMap::default(),
            seed,
            wander: Wander::new(),
        }
    }

    pub fn register(&mut self, id: ElementId, kind: ElementKind) {
        self.elements.insert(
            id,
            Element {
                kind,
                state: ElementState::default(),
            },
        );
    }

    /// Copy this frame's selection and transition flags from the machine.
    pub fn observe(&mut self, machine: &TransitionMachine) {
        self.observe_flags(
            machine.selection().unwrap_or(self.selection),
            machine.is_transitioning(),
            machine.tunnel().is_visible(),
        );
    }

    pub fn observe_flags(&mut self, selection: Selection, transitioning: bool, tunnel_visible: bool) {
        if transitioning && !self.transitioning {
            self.user_control = false;
        }
        if transitioning {
            self.hidden_in_flight |= selection.section != self.shown;
        } else {
            self.shown = selection.section;
            self.hidden_in_flight = false;
        }
        self.selection = selection;
        self.transitioning = transitioning;
        self.tunnel_visible = tunnel_visible;
        self.reset_unmounted();
    }

    /// Arrival: section geometry and orbit/pan come back.
    pub fn on_transition_complete(&mut self, done: &TransitionComplete) {
        self.selection = done.selection;
        self.shown = done.selection.section;
        self.hidden_in_flight = false;
        self.transitioning = false;
        self.tunnel_visible = false;
        self.user_control = true;
    }

    pub fn user_control_enabled(&self) -> bool {
        self.user_control
    }

    /// Section whose group may be drawn right now. A flight that changes
    /// section hides both the old and the new group until arrival, even if it
    /// is redirected back; a flight within one section keeps it.
    pub fn mounted_section(&self) -> Option<Section> {
        if self.transitioning && self.hidden_in_flight {
            None
        } else {
            Some(self.shown)
        }
    }

    pub fn mounted_groups(&self) -> SmallVec<[SceneGroup; 4]> {
        let mut groups = SmallVec::new();
        groups.push(SceneGroup::Backdrop);
        if let Some(section) = self.mounted_section() {
            groups.push(SceneGroup::for_section(section));
        }
        if self.tunnel_visible {
            groups.push(SceneGroup::SpaceTravel);
        }
        groups
    }

    pub fn is_mounted(&self, group: SceneGroup) -> bool {
        self.mounted_groups().contains(&group)
    }

    /// The one click signal from decorative elements. Ignored mid-flight,
    /// for unknown ids, for team members, and for elements whose group is
    /// not mounted.
    pub fn on_element_selected(&mut self, id: ElementId) -> Option<ElementEvent> {
        if self.transitioning {
            log::debug!("[composer] click on {id} ignored mid-flight");
            return None;
        }
        let section = self.mounted_section();
        let element = self.elements.get_mut(&id)?;
        if Some(element.kind.section()) != section {
            return None;
        }
        match element.kind {
            ElementKind::Project => {
                element.state.expanded = !element.state.expanded;
                Some(ElementEvent::ProjectToggled {
                    id,
                    expanded: element.state.expanded,
                })
            }
            ElementKind::TeamMember => None,
        }
    }

    pub fn set_hovered(&mut self, id: ElementId, hovered: bool) {
        if let Some(e) = self.elements.get_mut(&id) {
            e.state.hovered = hovered && !self.transitioning;
        }
    }

    pub fn element_scale(&self, id: ElementId) -> f32 {
        self.elements
            .get(&id)
            .map(|e| match e.kind {
                ElementKind::Project => hologram_scale(e.state.expanded, e.state.hovered),
                ElementKind::TeamMember => member_scale(e.state.hovered),
            })
            .unwrap_or(1.0)
    }

    /// Move page time forward; bad or negative deltas are ignored and single
    /// frames are capped at [`MAX_FRAME_DT`].
    pub fn advance_time(&mut self, dt: f32) {
        self.wander.advance(self.seed, dt);
    }

    /// Page time in seconds as seen by the composer.
    pub fn elapsed(&self) -> f64 {
        self.wander.elapsed
    }

    /// Wander targets for the default backdrop leaves. `exploring` pins them
    /// to their initial layout; the walk itself keeps going.
    pub fn leaf_positions(&self) -> Vec<Vec3> {
        if self.selection.exploring {
            DEFAULT_LEAF_POSITIONS.iter().map(|p| vec3(*p)).collect()
        } else {
            self.wander.leaves.clone()
        }
    }

    fn reset_unmounted(&mut self) {
        let mounted = self.mounted_section();
        for e in self.elements.values_mut() {
            if mounted != Some(e.kind.section()) {
                e.state = ElementState::default();
            }
        }
    }
}

const WANDER_DIRECTIONS: [(f32, f32); 4] = [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)];

/// Step `step` (1-based) of leaf `index`'s grid walk, starting from `from`.
///
/// The leaf moves [`WANDER_STEP`] units along one of the four grid directions
/// with a fresh height. The RNG is derived from `(seed, index, step)` alone, so
/// the walk is a pure function of seed and elapsed steps whatever the frame
/// cadence.
pub fn wander_step(seed: u64, index: usize, step: u64, from: Vec3) -> Vec3 {
    let mix = seed
        ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ step.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    let mut rng = StdRng::seed_from_u64(mix);
    let (dx, dz) = WANDER_DIRECTIONS[rng.gen_range(0..WANDER_DIRECTIONS.len())];
    Vec3::new(
        (from.x + dx * WANDER_STEP).clamp(-WANDER_LIMIT, WANDER_LIMIT),
        WANDER_HEIGHT_MIN + rng.gen::<f32>() * WANDER_HEIGHT_SPAN,
        (from.z + dz * WANDER_STEP).clamp(-WANDER_LIMIT, WANDER_LIMIT),
    )
}

/// Frame-rate independent ease of `current` toward `target` (5% per 60 Hz frame).
#[inline]
pub fn ease_toward(current: Vec3, target: Vec3, dt: f32) -> Vec3 {
    let alpha = 1.0 - 0.95_f32.powf(dt.max(0.0) * 60.0);
    current.lerp(target, alpha)
}

#[inline]
pub fn member_scale(hovered: bool) -> f32 {
    if hovered {
        MEMBER_SCALE_HOVERED
    } else {
        1.0
    }
}

#[inline]
pub fn hologram_scale(expanded: bool, hovered: bool) -> f32 {
    if expanded {
        HOLOGRAM_SCALE_EXPANDED
    } else if hovered {
        HOLOGRAM_SCALE_HOVERED
    } else {
        1.0
    }
}

/// Pulsing opacity of the lines between team members.
#[inline]
pub fn constellation_line_opacity(time: f32) -> f32 {
    (time * 2.0).sin() * 0.3 + 0.5
}
