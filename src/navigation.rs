//! Drill-down navigation over the catalog: Home -> Course -> Module, with a
//! video overlay that can only be opened from a module.
//!
//! Every operation returns a [`ViewDescriptor`], a plain snapshot the
//! presentation layer renders from. Rejected transitions leave the state
//! exactly as it was.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::access;
use crate::catalog::CatalogRepository;
use crate::selection::SelectionList;
use crate::types::{ids_match, Course, EntityRef, Lesson, Module};
use crate::youtube;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "lowercase")]
pub enum Rejection {
    #[error("course is locked")]
    Locked,
    #[error("nothing to show")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("navigation rejected: {0}")]
    Rejected(Rejection),
    #[error("lesson {lesson_id} has no playable video")]
    UnplayableVideo { lesson_id: String },
    #[error("videos can only be played from a module")]
    NotInModule,
}

impl NavigationError {
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(r) => Some(*r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTag {
    Home,
    Course,
    Module,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoOverlay {
    pub lesson: Lesson,
    pub video_id: String,
    pub embed_url: String,
}

/// The active level's sibling sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum Siblings {
    Courses(Vec<Course>),
    Modules(Vec<Module>),
    Lessons(Vec<Lesson>),
}

impl Siblings {
    pub fn len(&self) -> usize {
        match self {
            Self::Courses(v) => v.len(),
            Self::Modules(v) => v.len(),
            Self::Lessons(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn titles(&self) -> Vec<&str> {
        match self {
            Self::Courses(v) => v.iter().map(|c| c.title.as_str()).collect(),
            Self::Modules(v) => v.iter().map(|m| m.title.as_str()).collect(),
            Self::Lessons(v) => v.iter().map(|l| l.title.as_str()).collect(),
        }
    }
}

/// Read-only snapshot of the navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDescriptor {
    pub view: ViewTag,
    pub course: Option<Course>,
    pub module: Option<Module>,
    pub lesson: Option<Lesson>,
    pub siblings: Siblings,
    pub index: Option<usize>,
    pub video: Option<VideoOverlay>,
}

/// Keyboard input the navigator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "esc" | "escape" => Ok(Self::Escape),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "enter" | "return" => Ok(Self::Enter),
            "space" | " " => Ok(Self::Space),
            other => Err(format!("unknown key: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
enum State {
    Home,
    Course { course: Course },
    Module { course: Course, module: Module },
}

#[derive(Debug, Clone)]
enum Listing {
    Courses(SelectionList<Course>),
    Modules(SelectionList<Module>),
    Lessons(SelectionList<Lesson>),
}

macro_rules! with_list {
    ($listing:expr, $list:ident => $body:expr) => {
        match $listing {
            Listing::Courses($list) => $body,
            Listing::Modules($list) => $body,
            Listing::Lessons($list) => $body,
        }
    };
}

pub struct NavigationStateMachine {
    catalog: Arc<CatalogRepository>,
    purchased: Vec<String>,
    state: State,
    listing: Listing,
    video: Option<VideoOverlay>,
}

impl NavigationStateMachine {
    /// Starts at Home with the first course selected.
    pub fn new(catalog: Arc<CatalogRepository>, purchased: Vec<String>) -> Self {
        let listing = Listing::Courses(SelectionList::new(catalog.courses().to_vec()));
        Self { catalog, purchased, state: State::Home, listing, video: None }
    }

    /// Swap in a freshly ingested catalog and start over from Home.
    pub fn reload(&mut self, catalog: Arc<CatalogRepository>) -> ViewDescriptor {
        self.catalog = catalog;
        self.go_home()
    }

    pub fn catalog(&self) -> &Arc<CatalogRepository> { &self.catalog }

    pub fn purchased(&self) -> &[String] { &self.purchased }

    pub fn set_purchased(&mut self, purchased: Vec<String>) { self.purchased = purchased; }

    pub fn tag(&self) -> ViewTag {
        match self.state {
            State::Home => ViewTag::Home,
            State::Course { .. } => ViewTag::Course,
            State::Module { .. } => ViewTag::Module,
        }
    }

    /// The course in focus: highlighted at Home, entered otherwise.
    pub fn selected_course(&self) -> Option<&Course> {
        match (&self.state, &self.listing) {
            (State::Course { course } | State::Module { course, .. }, _) => Some(course),
            (State::Home, Listing::Courses(list)) => list.current(),
            _ => None,
        }
    }

    pub fn selected_module(&self) -> Option<&Module> {
        match (&self.state, &self.listing) {
            (State::Module { module, .. }, _) => Some(module),
            (State::Course { .. }, Listing::Modules(list)) => list.current(),
            _ => None,
        }
    }

    pub fn selected_lesson(&self) -> Option<&Lesson> {
        match &self.listing {
            Listing::Lessons(list) => list.current(),
            _ => None,
        }
    }

    /// The item under the cursor at the current level.
    pub fn focused(&self) -> Option<EntityRef<'_>> {
        match &self.listing {
            Listing::Courses(list) => list.current().map(EntityRef::Course),
            Listing::Modules(list) => list.current().map(EntityRef::Module),
            Listing::Lessons(list) => list.current().map(EntityRef::Lesson),
        }
    }

    pub fn video(&self) -> Option<&VideoOverlay> { self.video.as_ref() }

    pub fn view(&self) -> ViewDescriptor {
        let (siblings, index) = match &self.listing {
            Listing::Courses(l) => (Siblings::Courses(l.items().to_vec()), l.index()),
            Listing::Modules(l) => (Siblings::Modules(l.items().to_vec()), l.index()),
            Listing::Lessons(l) => (Siblings::Lessons(l.items().to_vec()), l.index()),
        };
        ViewDescriptor {
            view: self.tag(),
            course: self.selected_course().cloned(),
            module: self.selected_module().cloned(),
            lesson: self.selected_lesson().cloned(),
            siblings,
            index,
            video: self.video.clone(),
        }
    }

    pub fn go_home(&mut self) -> ViewDescriptor {
        debug!(courses = self.catalog.courses().len(), "navigate home");
        self.state = State::Home;
        self.listing = Listing::Courses(SelectionList::new(self.catalog.courses().to_vec()));
        self.video = None;
        self.view()
    }

    pub fn go_to_course(&mut self, course: &Course) -> Result<ViewDescriptor, NavigationError> {
        let modules = self.catalog.modules_of(&course.id);
        if modules.is_empty() {
            debug!(course = %course.id, "course has no modules");
            return Err(NavigationError::Rejected(Rejection::Empty));
        }
        debug!(course = %course.id, modules = modules.len(), "navigate to course");
        self.listing = Listing::Modules(SelectionList::from_refs(&modules));
        self.state = State::Course { course: course.clone() };
        self.video = None;
        Ok(self.view())
    }

    pub fn go_to_module(&mut self, module: &Module) -> Result<ViewDescriptor, NavigationError> {
        let course = match &self.state {
            State::Course { course } | State::Module { course, .. } => course.clone(),
            State::Home => return Err(NavigationError::Rejected(Rejection::Empty)),
        };
        if !ids_match(&module.course_id, &course.id) {
            debug!(course = %course.id, module = %module.id, "module belongs to another course");
            return Err(NavigationError::Rejected(Rejection::Empty));
        }
        if !access::is_unlocked(&course, &self.purchased) {
            debug!(course = %course.id, module = %module.id, "module locked");
            return Err(NavigationError::Rejected(Rejection::Locked));
        }
        let lessons = self.catalog.lessons_of(&module.id);
        if lessons.is_empty() {
            debug!(module = %module.id, "module has no lessons");
            return Err(NavigationError::Rejected(Rejection::Empty));
        }
        debug!(course = %course.id, module = %module.id, lessons = lessons.len(), "navigate to module");
        self.listing = Listing::Lessons(SelectionList::from_refs(&lessons));
        self.state = State::Module { course, module: module.clone() };
        self.video = None;
        Ok(self.view())
    }

    /// Module -> Course -> Home. At Home this does nothing.
    pub fn go_back(&mut self) -> Result<ViewDescriptor, NavigationError> {
        match &self.state {
            State::Module { course, .. } => {
                let course = course.clone();
                self.go_to_course(&course)
            }
            State::Course { .. } => Ok(self.go_home()),
            State::Home => Ok(self.view()),
        }
    }

    pub fn play_video(&mut self, lesson: &Lesson) -> Result<ViewDescriptor, NavigationError> {
        if !matches!(self.state, State::Module { .. }) {
            return Err(NavigationError::NotInModule);
        }
        let unplayable = || NavigationError::UnplayableVideo { lesson_id: lesson.id.clone() };
        let video_id = youtube::extract_video_id(&lesson.video_url).ok_or_else(unplayable)?;
        let embed_url = youtube::embed_url(&video_id).ok_or_else(unplayable)?;
        debug!(lesson = %lesson.id, %video_id, "play video");
        self.video = Some(VideoOverlay { lesson: lesson.clone(), video_id, embed_url });
        Ok(self.view())
    }

    pub fn close_video(&mut self) -> ViewDescriptor {
        if self.video.take().is_some() {
            debug!("close video");
        }
        self.view()
    }

    /// Move the cursor. Out-of-range indices leave the view unchanged.
    pub fn select(&mut self, index: usize) -> ViewDescriptor {
        with_list!(&mut self.listing, list => { list.select(index); });
        self.view()
    }

    pub fn prev(&mut self) -> ViewDescriptor {
        with_list!(&mut self.listing, list => { list.prev(); });
        self.view()
    }

    pub fn next(&mut self) -> ViewDescriptor {
        with_list!(&mut self.listing, list => { list.next(); });
        self.view()
    }

    /// Open whatever the cursor is on: a course, a module, or a lesson's video.
    pub fn activate(&mut self) -> Result<ViewDescriptor, NavigationError> {
        match &self.listing {
            Listing::Courses(list) => match list.current().cloned() {
                Some(course) => self.go_to_course(&course),
                None => Ok(self.view()),
            },
            Listing::Modules(list) => match list.current().cloned() {
                Some(module) => self.go_to_module(&module),
                None => Ok(self.view()),
            },
            Listing::Lessons(list) => match list.current().cloned() {
                Some(lesson) => self.play_video(&lesson),
                None => Ok(self.view()),
            },
        }
    }

    pub fn handle_key(&mut self, key: Key) -> Result<ViewDescriptor, NavigationError> {
        match key {
            Key::Escape if self.video.is_some() => Ok(self.close_video()),
            Key::Escape => self.go_back(),
            Key::Up | Key::Left => Ok(self.prev()),
            Key::Down | Key::Right => Ok(self.next()),
            Key::Enter => self.activate(),
            Key::Space => {
                let lesson = match (&self.state, &self.video) {
                    (State::Module { .. }, None) => self.selected_lesson().cloned(),
                    _ => None,
                };
                match lesson {
                    Some(lesson) => self.play_video(&lesson),
                    None => Ok(self.view()),
                }
            }
        }
    }
}
