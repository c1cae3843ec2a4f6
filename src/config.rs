use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::{ERROR_RECOVERY_DELAY, SLIDE_DURATION};
use crate::error::{ConfigError, PlaylistError};
use crate::faq::FaqEntry;
use crate::profile::Profile;
use crate::programme::ProgrammeEvent;
use crate::slide::{Playlist, Slide, SlideKind, default_label};

/// What [`resume`](crate::controller::PlaybackController::resume) does with
/// the progress of a paused image slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResumePolicy {
    /// Start the slide's display time over.
    #[default]
    Restart,
    /// Pick up where the pause left off.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub slide_duration_ms: u64,
    pub error_recovery_delay_ms: u64,
    pub resume_policy: ResumePolicy,
}

impl PlaybackConfig {
    pub fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms)
    }

    pub fn error_recovery_delay(&self) -> Duration {
        Duration::from_millis(self.error_recovery_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            slide_duration_ms: SLIDE_DURATION.as_millis() as u64,
            error_recovery_delay_ms: ERROR_RECOVERY_DELAY.as_millis() as u64,
            resume_policy: ResumePolicy::Restart,
        }
    }
}

/// One entry of the site file's slide list. Kind and label are optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideEntry {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<SlideKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SlideEntry {
    fn into_slide(self, position: usize) -> Slide {
        let kind = self.kind.unwrap_or_else(|| SlideKind::from_source(&self.source));
        let label = self.label.unwrap_or_else(|| default_label(position));
        Slide::new(self.source, kind, label)
    }
}

impl From<&str> for SlideEntry {
    fn from(source: &str) -> Self {
        Self {
            source: source.to_string(),
            kind: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub couple: String,
    pub wedding: DateTime<FixedOffset>,
    pub rsvp_deadline: NaiveDate,
    pub profiles: Vec<Profile>,
    pub programme: Vec<ProgrammeEvent>,
    pub slides: Vec<SlideEntry>,
    pub playback: PlaybackConfig,
    pub faq: Vec<FaqEntry>,
}

impl SiteConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.slides.is_empty() {
            return Err(PlaylistError::Empty.into());
        }
        info!(path = %path.display(), slides = config.slides.len(), "site file loaded");
        Ok(config)
    }

    pub fn playlist(&self) -> Result<Playlist, PlaylistError> {
        let slides = self
            .slides
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, entry)| entry.into_slide(i))
            .collect();
        Playlist::new(slides)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut slides: Vec<SlideEntry> = (1..=14)
            .map(|n| SlideEntry::from(format!("couple{n}.jpg").as_str()))
            .collect();
        slides.push(SlideEntry::from("reel1.mp4"));
        slides.push(SlideEntry::from("couple15.jpg"));

        Self {
            couple: "Camila & Richardson".to_string(),
            wedding: default_wedding(),
            rsvp_deadline: default_deadline(),
            profiles: default_profiles(),
            programme: default_programme(),
            slides,
            playback: PlaybackConfig::default(),
            faq: default_faq(),
        }
    }
}

// 2025-10-11 10:00 in Geneva (UTC+2)
fn default_wedding() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(2 * 3600).unwrap_or_else(|| Utc.fix());
    let utc = NaiveDate::from_ymd_opt(2025, 10, 11)
        .and_then(|date| NaiveTime::from_hms_opt(8, 0, 0).map(|time| NaiveDateTime::new(date, time)))
        .unwrap_or_default();
    DateTime::from_naive_utc_and_offset(utc, offset)
}

fn default_deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default()
}

fn default_profiles() -> Vec<Profile> {
    vec![
        Profile::new(
            "Camila",
            "Always smiling, passionate about travel and cooking. \
             She loves organising surprises and sharing moments with the people close to her.",
        ),
        Profile::new(
            "Richardson",
            "Epicurean, into music and sport. Always ready to make people laugh and set off on new adventures.",
        ),
    ]
}

fn default_programme() -> Vec<ProgrammeEvent> {
    let day = |d| NaiveDate::from_ymd_opt(2025, 10, d).unwrap_or_default();
    vec![
        ProgrammeEvent::new("Pre-party", day(10), "A relaxed evening to kick off the weekend!"),
        ProgrammeEvent::new("Ceremony", day(11), "The official ceremony and the exchange of vows."),
    ]
}

fn default_faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry::new(
            "Where is the ceremony?",
            "At the Geneva civil registry office, Rue de la Mairie 37, 1207 Geneva. \
             The building is easy to reach by public transport and there are public car parks all around it.",
        ),
        FaqEntry::new(
            "Can we give you a gift or contribute?",
            "Your presence is the best gift! If you would still like to do something, get in touch with us for the details.",
        ),
        FaqEntry::new(
            "Can I take pictures?",
            "Of course, take as many as you like! We would love it if you shared your best shots with us after the day.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_site_matches_the_invitation() {
        let site = SiteConfig::default();
        assert_eq!(site.wedding.to_rfc3339(), "2025-10-11T10:00:00+02:00");
        assert_eq!(site.rsvp_deadline, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());

        let playlist = site.playlist().unwrap();
        assert_eq!(playlist.len(), 16);
        assert!(playlist[14].is_video());
        assert_eq!(playlist[15].source, "couple15.jpg");
        assert_eq!(playlist[0].label, "Memory 1");
    }

    #[test]
    fn default_site_has_programme_and_profiles() {
        let site = SiteConfig::default();

        let titles: Vec<_> = site.programme.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Pre-party", "Ceremony"]);
        assert_eq!(site.programme[0].day_label(), "Friday 10 October 2025");
        assert_eq!(site.programme[1].day_label(), "Saturday 11 October 2025");
        assert_eq!(site.programme[1].date, site.wedding.date_naive());

        let names: Vec<_> = site.profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Camila", "Richardson"]);
        assert!(site.profiles.iter().all(|p| !p.bio.is_empty()));
    }

    #[test]
    fn site_file_can_replace_the_programme() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "programme": [ {{ "title": "Brunch", "date": "2025-10-12", "description": "Sunday recovery" }} ] }}"#
        )
        .unwrap();

        let site = SiteConfig::load(file.path()).unwrap();
        assert_eq!(site.programme.len(), 1);
        assert_eq!(site.programme[0].day_label(), "Sunday 12 October 2025");
        assert_eq!(site.profiles.len(), 2);
    }

    #[test]
    fn partial_site_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "slides": [
                    {{ "source": "intro.webm" }},
                    {{ "source": "stream", "kind": "video", "label": "Live" }},
                    {{ "source": "b.png" }}
                ],
                "playback": {{ "slide_duration_ms": 5000, "resume_policy": "continue" }}
            }}"#
        )
        .unwrap();

        let site = SiteConfig::load(file.path()).unwrap();
        assert_eq!(site.couple, "Camila & Richardson");
        assert_eq!(site.playback.slide_duration(), Duration::from_secs(5));
        assert_eq!(site.playback.error_recovery_delay(), ERROR_RECOVERY_DELAY);
        assert_eq!(site.playback.resume_policy, ResumePolicy::Continue);

        let playlist = site.playlist().unwrap();
        assert!(playlist[0].is_video());
        assert_eq!(playlist[1].label, "Live");
        assert!(playlist[1].is_video());
        assert!(!playlist[2].is_video());
    }

    #[test]
    fn site_file_without_slides_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "slides": [] }}"#).unwrap();
        let err = SiteConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Playlist(PlaylistError::Empty)));
    }

    #[test]
    fn malformed_site_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = SiteConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
