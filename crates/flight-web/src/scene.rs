use flight_core::{
    ElementEvent, ElementKind, FlightError, MachineState, SceneComposer, Selection,
    SelectionRequest, TransitionComplete, TransitionMachine, TransitionParams,
};
use glam::Vec3;

use super::constants::{LEAF_SEED, PROJECT_IDS, TEAM_MEMBER_IDS};
use super::nav::{self, NavAction};

/// What one frame produced, for the DOM and the JS renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameReport {
    pub completed: Option<TransitionComplete>,
    pub transitioning: bool,
}

/// Page-side scene state: the transition machine plus the composer it feeds.
pub struct SceneState {
    machine: TransitionMachine,
    composer: SceneComposer,
    selection: Selection,
    loop_claimed: bool,
}

impl SceneState {
    pub fn new(params: &TransitionParams, initial: Selection) -> Result<Self, FlightError> {
        let machine = TransitionMachine::new(params, initial.arrival_pose())?
            .with_initial_selection(initial);
        let mut composer = SceneComposer::new(initial, LEAF_SEED);
        for id in PROJECT_IDS {
            composer.register(id, ElementKind::Project);
        }
        for id in TEAM_MEMBER_IDS {
            composer.register(id, ElementKind::TeamMember);
        }
        composer.observe(&machine);
        Ok(Self {
            machine,
            composer,
            selection: initial,
            loop_claimed: false,
        })
    }

    pub fn machine(&self) -> &TransitionMachine {
        &self.machine
    }

    pub fn composer(&self) -> &SceneComposer {
        &self.composer
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Page time in seconds.
    pub fn clock(&self) -> f64 {
        self.composer.elapsed()
    }

    /// `true` for the first caller only; the frame loop must be started once.
    pub fn claim_frame_loop(&mut self) -> bool {
        !std::mem::replace(&mut self.loop_claimed, true)
    }

    pub fn request(&mut self, request: SelectionRequest) -> Result<bool, FlightError> {
        self.select(request.selection, request.staged)
    }

    pub fn select(&mut self, selection: Selection, staged: bool) -> Result<bool, FlightError> {
        self.selection = selection;
        let started = self.machine.on_selection_changed(selection, staged)?;
        self.composer.observe(&self.machine);
        Ok(started)
    }

    pub fn apply(&mut self, action: NavAction) -> Result<bool, FlightError> {
        match nav::resolve(self.selection, action) {
            Some((next, staged)) => self.select(next, staged),
            None => Ok(false),
        }
    }

    /// Forward a click; an expanded project opens the detail view.
    pub fn element_selected(&mut self, id: u32) -> Result<Option<ElementEvent>, FlightError> {
        let event = self.composer.on_element_selected(id);
        if let Some(ElementEvent::ProjectToggled { expanded, .. }) = event {
            let action = if expanded {
                NavAction::Explore
            } else {
                NavAction::LeaveExplore
            };
            self.apply(action)?;
        }
        Ok(event)
    }

    pub fn set_hovered(&mut self, id: u32, hovered: bool) {
        self.composer.set_hovered(id, hovered);
    }

    /// Advance camera, tunnel and composer by one frame.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        self.composer.advance_time(dt);
        let completed = self.machine.tick(dt);
        self.composer.observe(&self.machine);
        if let Some(done) = &completed {
            self.composer.on_transition_complete(done);
        }
        FrameReport {
            completed,
            transitioning: self.machine.state() == MachineState::Running,
        }
    }

    pub fn leaf_positions(&self) -> Vec<Vec3> {
        self.composer.leaf_positions()
    }
}
