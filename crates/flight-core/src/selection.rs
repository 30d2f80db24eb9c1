use std::fmt;
use std::str::FromStr;

use crate::camera::Pose;
use crate::constants::{
    vec3, ABOUT_ARRIVAL, EXPLORING_ARRIVAL, FOV_EXPLORING, FOV_REST, OVERVIEW_ARRIVAL,
};
use crate::error::FlightError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Projects,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Projects, Section::About, Section::Contact];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Projects => "projects",
            Section::About => "about",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projects" => Ok(Section::Projects),
            "about" => Ok(Section::About),
            "contact" => Ok(Section::Contact),
            _ => Err(FlightError::UnknownSection(s.to_string())),
        }
    }
}

/// What the page is showing: a section, and whether a detail view is open.
/// Owned by the page; the core only reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Selection {
    pub section: Section,
    pub exploring: bool,
}

impl Selection {
    pub const fn new(section: Section, exploring: bool) -> Self {
        Self { section, exploring }
    }

    /// Every (section, exploring) combination.
    pub fn all() -> impl Iterator<Item = Selection> {
        Section::ALL
            .into_iter()
            .flat_map(|s| [Selection::new(s, false), Selection::new(s, true)])
    }

    /// Final camera pose for this selection.
    ///
    /// `about` wins over `exploring`; the field of view still narrows when exploring.
    pub fn arrival_pose(&self) -> Pose {
        let position = match (self.section, self.exploring) {
            (Section::About, _) => ABOUT_ARRIVAL,
            (_, true) => EXPLORING_ARRIVAL,
            (_, false) => OVERVIEW_ARRIVAL,
        };
        Pose::new(vec3(position), self.resting_fov())
    }

    pub fn resting_fov(&self) -> f32 {
        if self.exploring {
            FOV_EXPLORING
        } else {
            FOV_REST
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(Section::Projects, false)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exploring {
            write!(f, "{}:explore", self.section)
        } else {
            write!(f, "{}", self.section)
        }
    }
}

/// A selection plus the caller's staging choice, written `section[:explore][:direct]`.
///
/// Used by navigation links (`data-section="projects:explore"`) and the native
/// driver's command line. Flights are staged unless `direct` is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRequest {
    pub selection: Selection,
    pub staged: bool,
}

impl FromStr for SelectionRequest {
    type Err = FlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let section = parts.next().unwrap_or_default().parse::<Section>()?;
        let mut request = SelectionRequest {
            selection: Selection::new(section, false),
            staged: true,
        };
        for flag in parts {
            match flag.trim() {
                "explore" => request.selection.exploring = true,
                "direct" => request.staged = false,
                "staged" => request.staged = true,
                _ => return Err(FlightError::InvalidParams("unknown selection flag")),
            }
        }
        Ok(request)
    }
}
