//! Read-only document rendering.
//!
//! Loads the portfolio from the selected store and prints it section by
//! section, with every icon reference resolved the way the site renderer
//! would resolve it. Used by `folio show`.

use anyhow::Result;

use crate::catalog::FALLBACK_ICON;
use crate::config::Config;
use crate::document::{PortfolioDocument, Section};
use crate::icon::{IconResolver, Resolved};
use crate::session::AuthState;
use crate::store::{open_store, Backend, Store};

/// Run the show command: load the document and print it (or one section).
pub async fn run_show(config: &Config, backend: Backend, section: Option<Section>) -> Result<()> {
    let now = chrono::Utc::now();
    let auth = AuthState::load(&config.admin.state_file, now)?;
    let store = open_store(backend, config, &auth);

    let doc = match store.load().await {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Uploaded images only resolve against a local origin; the published
    // site serves them from its own host.
    let resolver = match backend {
        Backend::Local => IconResolver::new(Some(config.server.origin())),
        Backend::Github => IconResolver::new(None),
    };

    match section {
        Some(section) => print_section(&doc, section, &resolver),
        None => {
            print_header(&doc, &resolver);
            for section in Section::ALL {
                print_section(&doc, section, &resolver);
            }
        }
    }

    Ok(())
}

fn print_header(doc: &PortfolioDocument, resolver: &IconResolver) {
    let info = &doc.personal_info;
    println!("Portfolio — {}", info.full_name);
    println!("{}", "=".repeat("Portfolio — ".len() + info.full_name.len()));
    println!();
    println!("  Name:      {}", info.name);
    println!("  Hero:      {}", info.hero_title);
    println!("  Subtitle:  {}", info.hero_subtitle);
    println!("  Logo:      {}", icon_display(resolver, &info.logo));
    println!();
}

fn print_section(doc: &PortfolioDocument, section: Section, resolver: &IconResolver) {
    println!("{} ({}):", section, section.len_in(doc));

    match section {
        Section::Nav => {
            for (i, nav) in doc.nav_links.iter().enumerate() {
                let link = nav.link.as_deref().unwrap_or("(scroll target)");
                println!("  {}. {:<20} {}", i, nav.title, link);
            }
        }
        Section::Services => {
            for (i, service) in doc.services.iter().enumerate() {
                println!(
                    "  {}. {:<24} {}",
                    i,
                    service.title,
                    icon_display(resolver, &service.icon)
                );
            }
        }
        Section::Technologies => {
            for (i, tech) in doc.technologies.iter().enumerate() {
                println!(
                    "  {}. {:<24} {}",
                    i,
                    tech.name,
                    icon_display(resolver, &tech.icon)
                );
            }
        }
        Section::Experiences => {
            for (i, exp) in doc.experiences.iter().enumerate() {
                println!("  {}. {} — {}", i, exp.title, exp.company_name);
                println!("     date: {}", exp.date);
                println!(
                    "     icon: {} (bg {})",
                    icon_display(resolver, &exp.icon),
                    exp.icon_bg
                );
                for (j, point) in exp.points.iter().enumerate() {
                    println!("     points[{}]: {}", j, truncate(point, 80));
                }
            }
        }
        Section::Projects => {
            for (i, project) in doc.projects.iter().enumerate() {
                println!("  {}. {}", i, project.name);
                println!("     {}", truncate(&project.description, 80));
                println!("     image: {}", icon_display(resolver, &project.image));
                let tags: Vec<String> = project
                    .tags
                    .iter()
                    .map(|t| format!("{} ({})", t.name, t.color))
                    .collect();
                println!("     tags: {}", tags.join(", "));
                if !project.source_code_link.is_empty() {
                    println!("     source: {}", project.source_code_link);
                }
                if !project.live_site_link.is_empty() {
                    println!("     live: {}", project.live_site_link);
                }
            }
        }
        Section::Testimonials => {
            for (i, t) in doc.testimonials.iter().enumerate() {
                println!("  {}. {} — {}, {}", i, t.name, t.designation, t.company);
                println!("     \"{}\"", truncate(&t.testimonial, 80));
                println!("     image: {}", icon_display(resolver, &t.image));
            }
        }
        Section::Socials => {
            for (i, social) in doc.socials.iter().enumerate() {
                println!(
                    "  {}. {:<16} {:<28} {}",
                    i,
                    social.name,
                    icon_display(resolver, &social.icon),
                    social.link
                );
            }
        }
    }

    println!();
}

/// Run the icon command: print how one reference string classifies.
///
/// Resolution is the same as rendering uses, with the local origin in
/// scope so `/uploads/` rewriting shows its effect.
pub fn run_icon(config: &Config, reference: &str) {
    let resolver = IconResolver::new(Some(config.server.origin()));
    match resolver.resolve(reference) {
        Resolved::Image(src) => println!("image     {}", src),
        Resolved::Icon(name) => println!("glyph     {}", name),
        Resolved::Fallback => println!(
            "fallback  {} ('{}' matched neither the asset table nor the icon catalog)",
            FALLBACK_ICON, reference
        ),
    }
}

/// One-line rendering of a resolved icon reference.
fn icon_display(resolver: &IconResolver, reference: &str) -> String {
    match resolver.resolve(reference) {
        Resolved::Image(src) => src,
        Resolved::Icon(name) => format!("glyph:{}", name),
        Resolved::Fallback => format!("glyph:{} (no match for '{}')", FALLBACK_ICON, reference),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("short", 80), "short");
        let long = "x".repeat(100);
        assert_eq!(truncate(&long, 10), format!("{}...", "x".repeat(10)));
        // Multi-byte input must not split inside a character.
        let accented = "é".repeat(100);
        assert!(truncate(&accented, 10).starts_with(&"é".repeat(10)));
    }
}
