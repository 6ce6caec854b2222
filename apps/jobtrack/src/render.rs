//! Plain-text rendering of view state for the terminal.

use std::fmt::Write;

use colored::{Color, Colorize};

use crate::models::application::{Application, ApplicationStatus, Tone};
use crate::models::job::Job;
use crate::models::resume::{ParsedResume, Resume};
use crate::models::stats::Stats;
use crate::views::resume::Mode;
use crate::views::{Level, Notification};

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::BrightBlack,
        Tone::Info => Color::Blue,
        Tone::Warning => Color::Yellow,
        Tone::Success => Color::Green,
        Tone::Danger => Color::Red,
    }
}

/// Status badge; colored unless `colored::control` has been switched off.
pub fn badge(status: ApplicationStatus) -> String {
    format!("{} {}", status.icon(), status)
        .color(tone_color(status.tone()))
        .to_string()
}

pub fn notification(note: &Notification) -> String {
    let (tone, prefix) = match note.level {
        Level::Success => (Tone::Success, "✔"),
        Level::Warning => (Tone::Warning, "⚠"),
        Level::Error => (Tone::Danger, "✘"),
    };
    format!("{prefix} {}", note.message)
        .color(tone_color(tone))
        .to_string()
}

pub fn stats(stats: &Stats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Jobs tracked:  {}", stats.total_jobs);
    let _ = writeln!(out, "Applications:  {}", stats.total_applications);
    for status in ApplicationStatus::ALL {
        let count = stats.count(status);
        if count > 0 {
            let _ = writeln!(out, "  {:<18} {count}", badge(status));
        }
    }
    out
}

pub fn jobs(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return "No jobs yet. Add one with `jobtrack jobs add`.\n".to_string();
    }
    let mut out = String::new();
    for job in jobs {
        let _ = write!(out, "[{}] {} — {}", job.id, job.title, job.company);
        if let Some(location) = &job.location {
            let _ = write!(out, " ({location})");
        }
        out.push('\n');
        if let Some(url) = &job.url {
            let _ = writeln!(out, "    {url}");
        }
    }
    out
}

pub fn applications(applications: &[&Application]) -> String {
    if applications.is_empty() {
        return "No applications yet.\n".to_string();
    }
    let mut out = String::new();
    for application in applications {
        let _ = writeln!(
            out,
            "[{}] {} — {}  {}  applied {}",
            application.id,
            application.job_title,
            application.company,
            badge(application.status),
            application.applied_at.format("%Y-%m-%d"),
        );
    }
    out
}

pub fn application_detail(application: &Application) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} — {}  {}",
        application.job_title,
        application.company,
        badge(application.status)
    );
    let _ = writeln!(out, "Applied: {}", application.applied_at.format("%Y-%m-%d %H:%M"));
    if let Some(updated) = application.updated_at {
        let _ = writeln!(out, "Updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    for (title, body) in [
        ("Tailored resume", &application.tailored_resume),
        ("Cover letter", &application.cover_letter),
    ] {
        let _ = writeln!(out, "\n== {title} ==");
        let _ = writeln!(out, "{}", body.as_deref().unwrap_or("(not generated)"));
    }
    out
}

pub fn resume(resume: Option<&Resume>, fields: Option<&ParsedResume>, mode: Mode) -> String {
    let (Some(resume), Some(fields)) = (resume, fields) else {
        return "No resume uploaded. Use `jobtrack resume upload <file>`.\n".to_string();
    };
    let mut out = String::new();
    if mode == Mode::Edit {
        out.push_str("(draft, not saved)\n");
    }
    let _ = writeln!(
        out,
        "{} — uploaded {}",
        resume.file_name,
        resume.uploaded_at.format("%Y-%m-%d")
    );
    if let Some(reason) = &fields.parse_error {
        let _ = writeln!(out, "Parsing failed: {reason}");
    }
    let _ = writeln!(out, "\n{}", fields.name);
    let contact: Vec<&str> = [fields.email.as_str(), fields.phone.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        let _ = writeln!(out, "{}", contact.join(" · "));
    }
    if !fields.summary.is_empty() {
        let _ = writeln!(out, "\n{}", fields.summary);
    }
    if !fields.skills.is_empty() {
        let _ = writeln!(out, "\nSkills:");
        for (i, skill) in fields.skills.iter().enumerate() {
            let _ = writeln!(out, "  {}. {skill}", i + 1);
        }
    }
    if !fields.experience.is_empty() {
        let _ = writeln!(out, "\nExperience:");
        for (i, entry) in fields.experience.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} at {} ({})",
                i + 1,
                entry.title,
                entry.company,
                entry.duration
            );
            if !entry.description.is_empty() {
                let _ = writeln!(out, "     {}", entry.description);
            }
        }
    }
    if !fields.education.is_empty() {
        let _ = writeln!(out, "\nEducation:");
        for (i, entry) in fields.education.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}, {} ({})",
                i + 1,
                entry.degree,
                entry.institution,
                entry.year
            );
        }
    }
    if !fields.keywords.is_empty() {
        let _ = writeln!(out, "\nKeywords: {}", fields.keywords.join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{application, job, resume as sample_resume};

    #[test]
    fn test_badge_text_and_tone_color() {
        assert!(badge(ApplicationStatus::Accepted).contains("✔ accepted"));
        assert_eq!(tone_color(ApplicationStatus::Rejected.tone()), Color::Red);
        assert_eq!(tone_color(ApplicationStatus::Applied.tone()), Color::Blue);
    }

    #[test]
    fn test_warning_notification_uses_warning_sign() {
        let note = Notification {
            level: Level::Warning,
            message: "Parsing failed".to_string(),
        };
        assert!(notification(&note).contains("⚠ Parsing failed"));
    }

    #[test]
    fn test_jobs_listing_includes_location() {
        let mut j = job("42", "Rust Engineer", "Ferris Inc");
        j.location = Some("Remote".to_string());
        let text = jobs(&[j]);
        assert!(text.contains("[42] Rust Engineer — Ferris Inc (Remote)"));
    }

    #[test]
    fn test_detail_marks_missing_documents() {
        let mut a = application("a1", &job("1", "SRE", "Acme"), ApplicationStatus::Pending, 3);
        a.cover_letter = None;
        let text = application_detail(&a);
        assert!(text.contains("== Cover letter ==\n(not generated)"));
        assert!(text.contains("Resume for SRE"));
    }

    #[test]
    fn test_resume_preview_numbers_entries() {
        let r = sample_resume();
        let text = resume(Some(&r), Some(&r.parsed_data), Mode::Preview);
        assert!(text.contains("  2. Poetry"));
        assert!(text.contains("Collaborator at Analytical Engine (1842-1843)"));
        assert!(!text.contains("draft"));
    }

    #[test]
    fn test_stats_lists_only_present_statuses() {
        let mut s = Stats {
            total_jobs: 4,
            total_applications: 2,
            ..Default::default()
        };
        s.by_status.insert("interview".to_string(), 2);
        let text = stats(&s);
        assert!(text.contains("☎ interview"));
        assert!(!text.contains("rejected"));
    }
}
