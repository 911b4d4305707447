//! The portfolio document model.
//!
//! A [`PortfolioDocument`] is the single JSON document the whole system
//! revolves around: one `personalInfo` object plus seven ordered collections.
//! It is always read and written wholesale; entries are addressed by
//! position and carry no identity of their own.
//!
//! Field names on the wire are bound by the published site, so the serde
//! renames here are load-bearing: `personalInfo`, `navLinks`, `iconBg` and
//! friends must serialize exactly as the consuming frontend expects them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The complete portfolio content document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDocument {
    pub personal_info: PersonalInfo,
    pub nav_links: Vec<NavLink>,
    pub services: Vec<Service>,
    pub technologies: Vec<Technology>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub testimonials: Vec<Testimonial>,
    pub socials: Vec<Social>,
}

/// Site identity and hero copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub full_name: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    /// Asset key, icon name, or image URL; resolved at render time.
    pub logo: String,
}

/// A header navigation entry. `link` is `null` for decorative entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub title: String,
    pub link: Option<String>,
}

/// A service block on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub title: String,
    pub icon: String,
}

/// A skill tile in the technologies grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub icon: String,
}

/// A work-history entry on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company_name: String,
    pub icon: String,
    #[serde(rename = "iconBg")]
    pub icon_bg: String,
    pub date: String,
    pub points: Vec<String>,
}

/// A colored tag attached to a project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub color: String,
}

/// A project card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub tags: Vec<Tag>,
    pub image: String,
    #[serde(default)]
    pub source_code_link: String,
    #[serde(default)]
    pub live_site_link: String,
}

/// A client testimonial card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub testimonial: String,
    pub name: String,
    pub designation: String,
    pub company: String,
    pub image: String,
}

/// A social/profile link in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Social {
    pub name: String,
    pub icon: String,
    pub link: String,
}

impl PortfolioDocument {
    /// A small but complete starter document, written by `folio init`.
    pub fn starter() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: "Studio".to_string(),
                full_name: "Your Name".to_string(),
                hero_title: "I build things for the web".to_string(),
                hero_subtitle: "Developer portfolio, managed with folio".to_string(),
                logo: "logo".to_string(),
            },
            nav_links: vec![
                NavLink {
                    title: "About".to_string(),
                    link: Some("#about".to_string()),
                },
                NavLink {
                    title: "Work".to_string(),
                    link: Some("#work".to_string()),
                },
                NavLink {
                    title: "Contact".to_string(),
                    link: None,
                },
            ],
            services: vec![
                Service {
                    title: "Web Development".to_string(),
                    icon: "web".to_string(),
                },
                Service {
                    title: "Backend Engineering".to_string(),
                    icon: "backend".to_string(),
                },
            ],
            technologies: vec![
                Technology {
                    name: "HTML 5".to_string(),
                    icon: "html".to_string(),
                },
                Technology {
                    name: "JavaScript".to_string(),
                    icon: "javascript".to_string(),
                },
                Technology {
                    name: "React JS".to_string(),
                    icon: "reactjs".to_string(),
                },
            ],
            experiences: vec![Experience {
                title: "Software Engineer".to_string(),
                company_name: "Acme".to_string(),
                icon: "tesla".to_string(),
                icon_bg: "#E6DEDD".to_string(),
                date: "2023 - Present".to_string(),
                points: vec![
                    "Shipped features across the stack.".to_string(),
                    "Owned deployment and observability.".to_string(),
                ],
            }],
            projects: vec![Project {
                name: "First Project".to_string(),
                description: "A project worth showing off.".to_string(),
                tags: vec![Tag {
                    name: "react".to_string(),
                    color: "blue-text-gradient".to_string(),
                }],
                image: "project1".to_string(),
                source_code_link: "https://github.com/".to_string(),
                live_site_link: String::new(),
            }],
            testimonials: vec![Testimonial {
                testimonial: "Great to work with.".to_string(),
                name: "Client".to_string(),
                designation: "CTO".to_string(),
                company: "Acme".to_string(),
                image: "user1".to_string(),
            }],
            socials: vec![Social {
                name: "GitHub".to_string(),
                icon: "github".to_string(),
                link: "https://github.com/".to_string(),
            }],
        }
    }
}

/// The seven editable collections of a [`PortfolioDocument`].
///
/// Parses from the CLI both under full names (`technologies`) and the short
/// tab aliases the admin surface has always used (`tech`, `exp`, `test`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Nav,
    Services,
    Technologies,
    Experiences,
    Projects,
    Testimonials,
    Socials,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Nav,
        Section::Services,
        Section::Technologies,
        Section::Experiences,
        Section::Projects,
        Section::Testimonials,
        Section::Socials,
    ];

    /// Canonical name, matching the document's JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            Section::Nav => "navLinks",
            Section::Services => "services",
            Section::Technologies => "technologies",
            Section::Experiences => "experiences",
            Section::Projects => "projects",
            Section::Testimonials => "testimonials",
            Section::Socials => "socials",
        }
    }

    /// Number of entries in this section of `doc`.
    pub fn len_in(&self, doc: &PortfolioDocument) -> usize {
        match self {
            Section::Nav => doc.nav_links.len(),
            Section::Services => doc.services.len(),
            Section::Technologies => doc.technologies.len(),
            Section::Experiences => doc.experiences.len(),
            Section::Projects => doc.projects.len(),
            Section::Testimonials => doc.testimonials.len(),
            Section::Socials => doc.socials.len(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nav" | "navlinks" | "navigation" => Ok(Section::Nav),
            "services" | "service" => Ok(Section::Services),
            "tech" | "technologies" | "technology" => Ok(Section::Technologies),
            "exp" | "experiences" | "experience" => Ok(Section::Experiences),
            "projects" | "project" => Ok(Section::Projects),
            "test" | "testimonials" | "testimonial" => Ok(Section::Testimonials),
            "social" | "socials" => Ok(Section::Socials),
            other => Err(format!(
                "unknown section '{}'. Valid sections: nav, services, tech, exp, projects, test, social",
                other
            )),
        }
    }
}
