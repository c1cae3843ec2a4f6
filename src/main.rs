use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use save_the_date::constants::RSVP_COLLECTION;
use save_the_date::countdown::Countdown;
use save_the_date::deadline::DeadlineGate;
use save_the_date::faq::Accordion;
use save_the_date::rsvp::{RsvpDocument, RsvpForm, RsvpRecord};
use save_the_date::store::{DocumentStore, JsonlStore};
use save_the_date::{Playlist, ResumePolicy, SiteConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod media_loader;
mod video;
mod viewer;

use crate::media_loader::scan_media_sources;

#[derive(Parser)]
#[command(name = "save-the-date", version, about = "Wedding invitation: story carousel, RSVP, countdown, programme and FAQ")]
struct Cli {
    /// Site file (JSON). Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    site: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the media carousel in a window
    Show(ShowArgs),
    /// Record or list guest responses
    #[command(subcommand)]
    Rsvp(RsvpCommand),
    /// Print the time left until the ceremony
    Countdown,
    /// Print the weekend's programme
    Programme,
    /// Print how the couple introduce each other
    About,
    /// Print the frequently asked questions
    Faq {
        /// Expand these entries (0-based); all are expanded when none are given
        #[arg(long, value_delimiter = ',')]
        open: Vec<usize>,
    },
}

#[derive(Args)]
struct ShowArgs {
    /// Directory the slide sources are resolved against
    #[arg(long, default_value = "public")]
    media_dir: PathBuf,
    /// Play every image and video found in the media directory instead of the site's list
    #[arg(long)]
    scan: bool,
    #[arg(long)]
    slide_duration_ms: Option<u64>,
    #[arg(long)]
    error_delay_ms: Option<u64>,
    #[arg(long, value_enum)]
    resume_policy: Option<ResumePolicy>,
}

#[derive(Subcommand)]
enum RsvpCommand {
    /// Send one response
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        party_size: u8,
        #[arg(long)]
        message: Option<String>,
        #[arg(long, default_value = "rsvp-data")]
        store: PathBuf,
    },
    /// List recorded responses
    List {
        #[arg(long, default_value = "rsvp-data")]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("save_the_date=info".parse()?))
        .init();

    let cli = Cli::parse();
    let site = match &cli.site {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };

    match cli.command {
        Command::Show(args) => show(&site, args),
        Command::Rsvp(command) => rsvp(&site, command),
        Command::Countdown => {
            match Countdown::until(&site.wedding, &Utc::now()) {
                Some(left) => println!("{left} until {}", site.wedding.format("%-d %B %Y, %H:%M")),
                None => println!("It's the big day!"),
            }
            Ok(())
        }
        Command::Programme => {
            let now = Utc::now();
            for event in &site.programme {
                let marker = if event.is_over_at(now) { " (over)" } else { "" };
                println!("{}{}\n  {}\n  {}", event.title, marker, event.day_label(), event.description);
            }
            Ok(())
        }
        Command::About => {
            for profile in &site.profiles {
                println!("{}\n  {}", profile.name, profile.bio);
            }
            Ok(())
        }
        Command::Faq { open } => {
            let mut accordion = Accordion::new(site.faq.clone());
            if open.is_empty() {
                (0..accordion.len()).for_each(|i| accordion.toggle(i));
            } else {
                open.iter().for_each(|&i| accordion.toggle(i));
            }
            for (entry, expanded) in accordion.iter() {
                if expanded {
                    println!("- {}\n  {}", entry.question, entry.answer);
                } else {
                    println!("+ {}", entry.question);
                }
            }
            Ok(())
        }
    }
}

fn show(site: &SiteConfig, args: ShowArgs) -> Result<()> {
    let playlist = if args.scan {
        Playlist::from_sources(scan_media_sources(&args.media_dir)?)?
    } else {
        site.playlist()?
    };

    let mut config = site.playback;
    if let Some(ms) = args.slide_duration_ms {
        config.slide_duration_ms = ms;
    }
    if let Some(ms) = args.error_delay_ms {
        config.error_recovery_delay_ms = ms;
    }
    if let Some(policy) = args.resume_policy {
        config.resume_policy = policy;
    }

    info!(
        slides = playlist.len(),
        slide_duration_ms = config.slide_duration_ms,
        resume_policy = ?config.resume_policy,
        "starting carousel"
    );
    viewer::run(&site.couple, site.wedding, playlist, &args.media_dir, config)
}

fn rsvp(site: &SiteConfig, command: RsvpCommand) -> Result<()> {
    match command {
        RsvpCommand::Submit {
            name,
            email,
            party_size,
            message,
            store,
        } => {
            let store = JsonlStore::open(store)?;
            let mut form = RsvpForm::new(DeadlineGate::new(site.rsvp_deadline), store);
            let now = Utc::now();
            let record = RsvpRecord::new(name, email, party_size, message);
            let id = form.submit(record, now).context("RSVP not recorded")?;

            println!("Thank you! Your RSVP was received (reference {id}).");
            let days = form.days_remaining_at(now);
            if days > 0 {
                println!("Responses close in {days} day(s).");
            }
            Ok(())
        }
        RsvpCommand::List { store } => {
            let store = JsonlStore::open(store)?;
            let documents = store.query(RSVP_COLLECTION)?;
            let mut guests = 0u32;
            for stored in &documents {
                let document: RsvpDocument = serde_json::from_value(stored.data.clone())
                    .with_context(|| format!("Malformed RSVP {}", stored.id))?;
                guests += u32::from(document.record.party_size);
                println!(
                    "{}  {:<24} {:<32} {}  {}",
                    stored.id,
                    document.record.name,
                    document.record.email,
                    document.record.party_size,
                    document.submitted_at.format("%Y-%m-%d %H:%M"),
                );
            }
            println!("{} response(s), {} guest(s)", documents.len(), guests);
            Ok(())
        }
    }
}
