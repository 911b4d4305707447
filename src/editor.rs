//! Collection editing over the portfolio document.
//!
//! Every collection is edited the same three ways, whatever its entry type:
//! append a default entry, remove an entry by position, or set one field of
//! one entry in place. [`EntryOps`] is the capability each entry type
//! implements to take part; [`append`], [`remove`], and [`set_path`] are the
//! generic operations on top, addressed with small textual paths
//! (`personal.name`, `technologies[2].icon`, `experiences[0].points[1]`).
//!
//! Edits only ever touch an in-memory document. Persisting is always the
//! whole document, and [`EditorSession`] enforces the one-save-at-a-time
//! rule while a save is in flight.

use thiserror::Error;

use crate::document::{
    Experience, NavLink, PersonalInfo, PortfolioDocument, Project, Section, Service, Social, Tag,
    Technology, Testimonial,
};

/// Errors surfaced by editing operations.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("a save is already in flight")]
    SaveInFlight,

    #[error("{section}[{index}] is out of range ({len} entries)")]
    IndexOutOfRange {
        section: String,
        index: usize,
        len: usize,
    },

    #[error("unknown field '{field}' (expected one of: {expected})")]
    UnknownField { field: String, expected: String },

    #[error("cannot parse edit path '{path}': {reason}")]
    BadPath { path: String, reason: String },
}

impl EditError {
    fn out_of_range(section: impl Into<String>, index: usize, len: usize) -> Self {
        EditError::IndexOutOfRange {
            section: section.into(),
            index,
            len,
        }
    }

    fn bad_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        EditError::BadPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Capability implemented by every collection entry type.
pub trait EntryOps: Sized {
    /// Field names accepted by [`set_field`](EntryOps::set_field), for
    /// error messages.
    const FIELDS: &'static [&'static str];

    /// The fixed entry appended by the "add" operation.
    fn default_entry() -> Self;

    /// Set one field in place from its string form.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError>;

    fn unknown_field(field: &str) -> EditError {
        EditError::UnknownField {
            field: field.to_string(),
            expected: Self::FIELDS.join(", "),
        }
    }
}

impl EntryOps for NavLink {
    const FIELDS: &'static [&'static str] = &["title", "link"];

    fn default_entry() -> Self {
        NavLink {
            title: "New Link".to_string(),
            link: None,
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "title" => self.title = value.to_string(),
            // An emptied link reverts to null, keeping the entry decorative.
            "link" => {
                self.link = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Service {
    const FIELDS: &'static [&'static str] = &["title", "icon"];

    fn default_entry() -> Self {
        Service {
            title: "New Service".to_string(),
            icon: "Zap".to_string(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "title" => self.title = value.to_string(),
            "icon" => self.icon = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Technology {
    const FIELDS: &'static [&'static str] = &["name", "icon"];

    fn default_entry() -> Self {
        Technology {
            name: "New Skill".to_string(),
            icon: "html".to_string(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "name" => self.name = value.to_string(),
            "icon" => self.icon = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Experience {
    const FIELDS: &'static [&'static str] = &[
        "title",
        "company_name",
        "icon",
        "iconBg",
        "date",
        "points[<i>]",
    ];

    fn default_entry() -> Self {
        Experience {
            title: "New Role".to_string(),
            company_name: "Org".to_string(),
            icon: "tesla".to_string(),
            icon_bg: "#E6DEDD".to_string(),
            date: "Present".to_string(),
            points: vec!["New record...".to_string()],
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        if let Some((name, Some(i))) = split_index(field) {
            if name == "points" {
                let len = self.points.len();
                let slot = self
                    .points
                    .get_mut(i)
                    .ok_or_else(|| EditError::out_of_range("points", i, len))?;
                *slot = value.to_string();
                return Ok(());
            }
        }
        match field {
            "title" => self.title = value.to_string(),
            "company_name" => self.company_name = value.to_string(),
            "icon" => self.icon = value.to_string(),
            "iconBg" | "icon_bg" => self.icon_bg = value.to_string(),
            "date" => self.date = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Tag {
    const FIELDS: &'static [&'static str] = &["name", "color"];

    fn default_entry() -> Self {
        Tag {
            name: "react".to_string(),
            color: "blue-text-gradient".to_string(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "name" => self.name = value.to_string(),
            "color" => self.color = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Project {
    const FIELDS: &'static [&'static str] = &[
        "name",
        "description",
        "image",
        "source_code_link",
        "live_site_link",
        "tags[<i>].name",
        "tags[<i>].color",
    ];

    fn default_entry() -> Self {
        Project {
            name: "New Project".to_string(),
            description: "...".to_string(),
            tags: vec![Tag::default_entry()],
            image: "project1".to_string(),
            source_code_link: String::new(),
            live_site_link: String::new(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        if let Some(rest) = field.strip_prefix("tags") {
            let (head, tail) = match rest.split_once('.') {
                Some((h, t)) => (format!("tags{}", h), t),
                None => return Err(Self::unknown_field(field)),
            };
            let Some(("tags", Some(i))) = split_index(&head) else {
                return Err(Self::unknown_field(field));
            };
            let len = self.tags.len();
            let tag = self
                .tags
                .get_mut(i)
                .ok_or_else(|| EditError::out_of_range("tags", i, len))?;
            return tag.set_field(tail, value);
        }
        match field {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            "image" => self.image = value.to_string(),
            "source_code_link" => self.source_code_link = value.to_string(),
            "live_site_link" => self.live_site_link = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Testimonial {
    const FIELDS: &'static [&'static str] =
        &["testimonial", "name", "designation", "company", "image"];

    fn default_entry() -> Self {
        Testimonial {
            testimonial: "Record pending...".to_string(),
            name: "Agent Name".to_string(),
            designation: "Exec".to_string(),
            company: "Org".to_string(),
            image: "user1".to_string(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "testimonial" => self.testimonial = value.to_string(),
            "name" => self.name = value.to_string(),
            "designation" => self.designation = value.to_string(),
            "company" => self.company = value.to_string(),
            "image" => self.image = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

impl EntryOps for Social {
    const FIELDS: &'static [&'static str] = &["name", "icon", "link"];

    fn default_entry() -> Self {
        Social {
            name: "Platform".to_string(),
            icon: "web".to_string(),
            link: "https://".to_string(),
        }
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), EditError> {
        match field {
            "name" => self.name = value.to_string(),
            "icon" => self.icon = value.to_string(),
            "link" => self.link = value.to_string(),
            _ => return Err(Self::unknown_field(field)),
        }
        Ok(())
    }
}

const PERSONAL_FIELDS: &[&str] = &["name", "fullName", "heroTitle", "heroSubtitle", "logo"];

/// Set one field of the `personalInfo` object. Accepts wire-form names and
/// their snake_case spellings interchangeably.
pub fn set_personal_field(
    info: &mut PersonalInfo,
    field: &str,
    value: &str,
) -> Result<(), EditError> {
    match field {
        "name" => info.name = value.to_string(),
        "fullName" | "full_name" => info.full_name = value.to_string(),
        "heroTitle" | "hero_title" => info.hero_title = value.to_string(),
        "heroSubtitle" | "hero_subtitle" => info.hero_subtitle = value.to_string(),
        "logo" => info.logo = value.to_string(),
        _ => {
            return Err(EditError::UnknownField {
                field: field.to_string(),
                expected: PERSONAL_FIELDS.join(", "),
            })
        }
    }
    Ok(())
}

fn append_default<T: EntryOps>(list: &mut Vec<T>) {
    list.push(T::default_entry());
}

fn remove_at<T>(section: &str, list: &mut Vec<T>, index: usize) -> Result<T, EditError> {
    if index >= list.len() {
        return Err(EditError::out_of_range(section, index, list.len()));
    }
    Ok(list.remove(index))
}

/// What an append or remove operation points at: a whole section, or one
/// of the small lists nested inside an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Section(Section),
    /// `experiences[<i>].points`
    Points { entry: usize },
    /// `projects[<i>].tags`
    Tags { entry: usize },
}

impl EditTarget {
    pub fn parse(s: &str) -> Result<Self, EditError> {
        if let Some((head, tail)) = s.split_once('.') {
            let (name, index) = split_index(head)
                .ok_or_else(|| EditError::bad_path(s, "expected '<section>[<index>].<list>'"))?;
            let index =
                index.ok_or_else(|| EditError::bad_path(s, "missing entry index before '.'"))?;
            let section: Section = name
                .parse()
                .map_err(|e: String| EditError::bad_path(s, e))?;
            return match (section, tail) {
                (Section::Experiences, "points") => Ok(EditTarget::Points { entry: index }),
                (Section::Projects, "tags") => Ok(EditTarget::Tags { entry: index }),
                _ => Err(EditError::bad_path(
                    s,
                    "only experiences[...].points and projects[...].tags are list fields",
                )),
            };
        }
        let section: Section = s.parse().map_err(|e: String| EditError::bad_path(s, e))?;
        Ok(EditTarget::Section(section))
    }
}

/// Append the target's fixed default entry.
pub fn append(doc: &mut PortfolioDocument, target: &EditTarget) -> Result<(), EditError> {
    match target {
        EditTarget::Section(section) => match section {
            Section::Nav => append_default(&mut doc.nav_links),
            Section::Services => append_default(&mut doc.services),
            Section::Technologies => append_default(&mut doc.technologies),
            Section::Experiences => append_default(&mut doc.experiences),
            Section::Projects => append_default(&mut doc.projects),
            Section::Testimonials => append_default(&mut doc.testimonials),
            Section::Socials => append_default(&mut doc.socials),
        },
        EditTarget::Points { entry } => {
            let exp = entry_mut(&mut doc.experiences, "experiences", *entry)?;
            exp.points.push("Add log entry...".to_string());
        }
        EditTarget::Tags { entry } => {
            let project = entry_mut(&mut doc.projects, "projects", *entry)?;
            project.tags.push(Tag::default_entry());
        }
    }
    Ok(())
}

/// Remove the entry at `index` from the target, shifting later entries up.
pub fn remove(
    doc: &mut PortfolioDocument,
    target: &EditTarget,
    index: usize,
) -> Result<(), EditError> {
    match target {
        EditTarget::Section(section) => match section {
            Section::Nav => {
                remove_at("navLinks", &mut doc.nav_links, index)?;
            }
            Section::Services => {
                remove_at("services", &mut doc.services, index)?;
            }
            Section::Technologies => {
                remove_at("technologies", &mut doc.technologies, index)?;
            }
            Section::Experiences => {
                remove_at("experiences", &mut doc.experiences, index)?;
            }
            Section::Projects => {
                remove_at("projects", &mut doc.projects, index)?;
            }
            Section::Testimonials => {
                remove_at("testimonials", &mut doc.testimonials, index)?;
            }
            Section::Socials => {
                remove_at("socials", &mut doc.socials, index)?;
            }
        },
        EditTarget::Points { entry } => {
            let exp = entry_mut(&mut doc.experiences, "experiences", *entry)?;
            remove_at("points", &mut exp.points, index)?;
        }
        EditTarget::Tags { entry } => {
            let project = entry_mut(&mut doc.projects, "projects", *entry)?;
            remove_at("tags", &mut project.tags, index)?;
        }
    }
    Ok(())
}

/// Apply a field-level edit addressed by path.
///
/// Accepted forms:
///
/// - `personal.<field>` (alias `personalInfo.<field>`)
/// - `<section>[<index>].<field>`
/// - `experiences[<i>].points[<j>]`, `projects[<i>].tags[<j>].<field>`
pub fn set_path(doc: &mut PortfolioDocument, path: &str, value: &str) -> Result<(), EditError> {
    let (head, rest) = path
        .split_once('.')
        .ok_or_else(|| EditError::bad_path(path, "expected '<target>.<field>'"))?;

    if head == "personal" || head == "personalInfo" {
        return set_personal_field(&mut doc.personal_info, rest, value);
    }

    let (name, index) = split_index(head).ok_or_else(|| {
        EditError::bad_path(path, "expected 'personal.<field>' or '<section>[<index>].<field>'")
    })?;
    let index = index.ok_or_else(|| EditError::bad_path(path, "missing entry index"))?;
    let section: Section = name
        .parse()
        .map_err(|e: String| EditError::bad_path(path, e))?;

    match section {
        Section::Nav => entry_mut(&mut doc.nav_links, "navLinks", index)?.set_field(rest, value),
        Section::Services => entry_mut(&mut doc.services, "services", index)?.set_field(rest, value),
        Section::Technologies => {
            entry_mut(&mut doc.technologies, "technologies", index)?.set_field(rest, value)
        }
        Section::Experiences => {
            entry_mut(&mut doc.experiences, "experiences", index)?.set_field(rest, value)
        }
        Section::Projects => entry_mut(&mut doc.projects, "projects", index)?.set_field(rest, value),
        Section::Testimonials => {
            entry_mut(&mut doc.testimonials, "testimonials", index)?.set_field(rest, value)
        }
        Section::Socials => entry_mut(&mut doc.socials, "socials", index)?.set_field(rest, value),
    }
}

fn entry_mut<'a, T>(
    list: &'a mut [T],
    section: &str,
    index: usize,
) -> Result<&'a mut T, EditError> {
    let len = list.len();
    list.get_mut(index)
        .ok_or_else(|| EditError::out_of_range(section, index, len))
}

/// Parse `name[3]` into `("name", Some(3))` and bare `name` into
/// `("name", None)`. Returns `None` for malformed index brackets.
fn split_index(token: &str) -> Option<(&str, Option<usize>)> {
    match token.split_once('[') {
        None => Some((token, None)),
        Some((name, rest)) => {
            let digits = rest.strip_suffix(']')?;
            let index: usize = digits.parse().ok()?;
            Some((name, Some(index)))
        }
    }
}

/// In-memory editing state: the working copy of the document plus the
/// save guard.
///
/// Saves are whole-document and strictly one at a time: [`begin_save`]
/// hands out a snapshot to transmit and arms the guard; further calls fail
/// with [`EditError::SaveInFlight`] until [`finish_save`] is called,
/// whether the save succeeded or not. There is no cancellation.
///
/// [`begin_save`]: EditorSession::begin_save
/// [`finish_save`]: EditorSession::finish_save
#[derive(Debug)]
pub struct EditorSession {
    doc: PortfolioDocument,
    save_in_flight: bool,
}

impl EditorSession {
    pub fn new(doc: PortfolioDocument) -> Self {
        Self {
            doc,
            save_in_flight: false,
        }
    }

    pub fn document(&self) -> &PortfolioDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut PortfolioDocument {
        &mut self.doc
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Take a snapshot of the whole document for transmission.
    pub fn begin_save(&mut self) -> Result<PortfolioDocument, EditError> {
        if self.save_in_flight {
            return Err(EditError::SaveInFlight);
        }
        self.save_in_flight = true;
        Ok(self.doc.clone())
    }

    /// Re-arm the guard once the outstanding save has completed.
    pub fn finish_save(&mut self) {
        self.save_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> PortfolioDocument {
        PortfolioDocument::starter()
    }

    #[test]
    fn test_append_then_remove_restores_collection() {
        let mut d = doc();
        let before = d.technologies.clone();

        let target = EditTarget::parse("tech").unwrap();
        append(&mut d, &target).unwrap();
        assert_eq!(d.technologies.len(), before.len() + 1);
        let added = d.technologies.last().unwrap();
        assert_eq!(added.name, "New Skill");
        assert_eq!(added.icon, "html");

        remove(&mut d, &target, before.len()).unwrap();
        assert_eq!(d.technologies, before);
    }

    #[test]
    fn test_remove_shifts_positions() {
        let mut d = doc();
        let second = d.technologies[1].clone();
        remove(&mut d, &EditTarget::Section(Section::Technologies), 0).unwrap();
        assert_eq!(d.technologies[0], second);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut d = doc();
        let err = remove(&mut d, &EditTarget::Section(Section::Socials), 7).unwrap_err();
        assert!(matches!(
            err,
            EditError::IndexOutOfRange { index: 7, len: 1, .. }
        ));
    }

    #[test]
    fn test_set_personal_name() {
        let mut d = doc();
        set_path(&mut d, "personal.name", "Nova").unwrap();
        assert_eq!(d.personal_info.name, "Nova");

        set_path(&mut d, "personalInfo.heroTitle", "Hi").unwrap();
        assert_eq!(d.personal_info.hero_title, "Hi");
    }

    #[test]
    fn test_set_entry_field() {
        let mut d = doc();
        set_path(&mut d, "technologies[0].icon", "typescript").unwrap();
        assert_eq!(d.technologies[0].icon, "typescript");

        set_path(&mut d, "exp[0].iconBg", "#0000FF").unwrap();
        assert_eq!(d.experiences[0].icon_bg, "#0000FF");
    }

    #[test]
    fn test_edit_experience_points() {
        let mut d = doc();
        set_path(&mut d, "experiences[0].points[1]", "Rewrote the docs.").unwrap();
        assert_eq!(d.experiences[0].points[1], "Rewrote the docs.");

        let points = EditTarget::parse("experiences[0].points").unwrap();
        append(&mut d, &points).unwrap();
        assert_eq!(d.experiences[0].points.last().unwrap(), "Add log entry...");

        remove(&mut d, &points, 2).unwrap();
        assert_eq!(d.experiences[0].points.len(), 2);
    }

    #[test]
    fn test_edit_project_tags() {
        let mut d = doc();
        set_path(&mut d, "projects[0].tags[0].color", "green-text-gradient").unwrap();
        assert_eq!(d.projects[0].tags[0].color, "green-text-gradient");

        let tags = EditTarget::parse("projects[0].tags").unwrap();
        append(&mut d, &tags).unwrap();
        assert_eq!(d.projects[0].tags.len(), 2);
        assert_eq!(d.projects[0].tags[1].name, "react");
    }

    #[test]
    fn test_emptied_nav_link_becomes_null() {
        let mut d = doc();
        set_path(&mut d, "nav[0].link", "").unwrap();
        assert_eq!(d.nav_links[0].link, None);
    }

    #[test]
    fn test_unknown_field_names_alternatives() {
        let mut d = doc();
        let err = set_path(&mut d, "socials[0].url", "x").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown field 'url'"), "{}", msg);
        assert!(msg.contains("link"), "{}", msg);
    }

    #[test]
    fn test_bad_paths() {
        let mut d = doc();
        assert!(matches!(
            set_path(&mut d, "technologies", "x").unwrap_err(),
            EditError::BadPath { .. }
        ));
        assert!(matches!(
            set_path(&mut d, "technologies.icon", "x").unwrap_err(),
            EditError::BadPath { .. }
        ));
        assert!(matches!(
            set_path(&mut d, "brand[0].name", "x").unwrap_err(),
            EditError::BadPath { .. }
        ));
        assert!(matches!(
            EditTarget::parse("experiences[0].icon").unwrap_err(),
            EditError::BadPath { .. }
        ));
    }

    #[test]
    fn test_save_guard_is_single_flight() {
        let mut session = EditorSession::new(doc());
        let snapshot = session.begin_save().unwrap();
        assert_eq!(&snapshot, session.document());

        assert!(matches!(
            session.begin_save().unwrap_err(),
            EditError::SaveInFlight
        ));

        session.finish_save();
        assert!(session.begin_save().is_ok());
    }

    #[test]
    fn test_guard_rearms_after_failed_save() {
        // finish_save is called on both outcomes; a failed save must not
        // wedge the editor.
        let mut session = EditorSession::new(doc());
        let _ = session.begin_save().unwrap();
        session.finish_save();
        assert!(!session.save_in_flight());
    }
}
