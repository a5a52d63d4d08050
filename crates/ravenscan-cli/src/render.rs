// Plain-text rendering of results and history
use chrono::Local;
use ravenscan_core::models::{BrandCheckResult, DomainStatus, HistoryEntry, SocialStatus};
use ravenscan_core::ThemePreference;
use std::fmt::Write;

/// How many SEO hits to list under a result
const TOP_RESULTS_SHOWN: usize = 3;

/// ANSI colours for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub good: &'static str,
    pub bad: &'static str,
    pub warn: &'static str,
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    /// Bright colours read better on dark backgrounds, regular ones on light
    pub fn for_theme(theme: ThemePreference) -> Self {
        match theme {
            ThemePreference::Dark => Self {
                good: "\x1b[92m",
                bad: "\x1b[91m",
                warn: "\x1b[93m",
                accent: "\x1b[95m",
                muted: "\x1b[90m",
                reset: "\x1b[0m",
            },
            ThemePreference::Light => Self {
                good: "\x1b[32m",
                bad: "\x1b[31m",
                warn: "\x1b[33m",
                accent: "\x1b[34m",
                muted: "\x1b[2m",
                reset: "\x1b[0m",
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            good: "",
            bad: "",
            warn: "",
            accent: "",
            muted: "",
            reset: "",
        }
    }
}

pub fn render_result(result: &BrandCheckResult, p: &Palette) -> String {
    let mut out = String::new();

    if let Some(name) = &result.brand_name {
        let _ = writeln!(out, "{}Results for \"{}\"{}", p.accent, name, p.reset);
    }

    if let Some(domains) = result.domains.as_ref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\nDomains");
        for (domain, status) in domains {
            let label = match status {
                DomainStatus::Available => format!("{}✅ Available{}", p.good, p.reset),
                DomainStatus::Taken => format!("{}❌ Taken{}", p.bad, p.reset),
            };
            let _ = writeln!(out, "  {:<28} {}", domain, label);

            let whois = result.whois.as_ref().and_then(|w| w.get(domain));
            if let Some(record) = whois {
                if let Some(registrar) = &record.registrar {
                    let _ = write!(out, "  {}  registrar: {}", p.muted, registrar);
                    if let Some(expiration) = &record.expiration {
                        let _ = write!(out, ", expires {}", expiration);
                    }
                    let _ = writeln!(out, "{}", p.reset);
                }
            }
        }
    }

    if let Some(socials) = result.socials.as_ref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "\nSocial handles");
        for (platform, status) in socials {
            let (colour, icon) = match status {
                SocialStatus::Available => (p.good, "✅"),
                SocialStatus::Taken => (p.bad, "❌"),
                SocialStatus::Unknown => (p.warn, "⚠️"),
            };
            let _ = writeln!(out, "  {:<28} {}{} {}{}", platform, colour, icon, status, p.reset);
        }
    }

    // `seo: {}` means the service skipped the lookup
    let seo = result
        .seo
        .as_ref()
        .filter(|s| s.hits > 0 || !s.top_results.is_empty());
    if let Some(seo) = seo {
        let _ = writeln!(out, "\nSEO");
        let _ = writeln!(out, "  Search hits: {}", seo.hits);
        for url in seo.top_results.iter().take(TOP_RESULTS_SHOWN) {
            let _ = writeln!(out, "  {}- {}{}", p.muted, url, p.reset);
        }
    }

    if let Some(suggestions) = result.suggestions.as_ref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "\nSuggestions");
        let _ = writeln!(out, "  {}", suggestions.join(", "));
    }

    if out.is_empty() {
        out.push_str("The service returned no sections for this name.\n");
    }

    out
}

/// Dashboard-style listing, newest first
pub fn render_history(entries: &[HistoryEntry], p: &Palette) -> String {
    if entries.is_empty() {
        return "No search history yet.\n".to_string();
    }

    let mut out = String::new();
    for (position, entry) in entries.iter().enumerate() {
        let when = entry.timestamp.with_timezone(&Local);
        let available = entry.result.available_domains().len();
        let _ = writeln!(
            out,
            "{:>3}. {}#{:<4}{} {:<24} {}{}{}  {} free domain(s)",
            position,
            p.muted,
            entry.id,
            p.reset,
            entry.query,
            p.muted,
            when.format("%Y-%m-%d at %H:%M:%S"),
            p.reset,
            available
        );
    }
    out
}
