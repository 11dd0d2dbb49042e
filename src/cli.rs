use clap::{Args, Parser, Subcommand};
use termimad::MadSkin;
use thiserror::Error;

use crate::auth::{AuthError, AuthProvider, require_uid};
use crate::config::Config;
use crate::database::Database;
use crate::error::ServiceError;
use crate::gift_ideas::{self, IdeaInput, IdeaPatch};
use crate::gifts::{self, ConvertOptions, GiftInput, GiftPatch};
use crate::models::{Gift, GiftKind, GiftStatus, IdeaStatus, OccasionType, ShareKind, ShareLink};
use crate::occasions::{self, OccasionFilter, OccasionInput, OccasionPatch, StatusFilter, Timeframe};
use crate::persons::{self, PersonFilter, PersonInput};
use crate::share;
use crate::suggestions;
use crate::utils::{get_current_date_string, relative_day_label, today, truncate_chars};
use crate::validate::{parse_status, parse_type};

/// Shared-view content is cut to this many characters
const SHARED_CONTENT_MAX_CHARS: usize = 240;

#[derive(Parser)]
#[command(name = "gifts")]
#[command(about = "Gift manager - people, occasions, gift ideas and share links in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Log in with email and password
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Manage persons
    #[command(subcommand)]
    Person(PersonCommand),
    /// Manage occasions
    #[command(subcommand)]
    Occasion(OccasionCommand),
    /// Manage gift ideas
    #[command(subcommand)]
    Idea(IdeaCommand),
    /// Manage gifts
    #[command(subcommand)]
    Gift(GiftCommand),
    /// Create, open and deactivate share links
    #[command(subcommand)]
    Share(ShareCommand),
    /// Suggest gift ideas for a person from earlier gifts
    Suggest {
        person_id: i64,
        /// Store the N-th suggestion (1-based) as a gift idea
        #[arg(long)]
        adopt: Option<usize>,
    },
}

#[derive(Subcommand)]
pub enum PersonCommand {
    /// Add a person
    Add {
        name: String,
        /// Birthday (YYYY-MM-DD)
        #[arg(long)]
        birthday: Option<String>,
        #[arg(long, default_value = "")]
        info: String,
    },
    /// List persons
    List {
        /// Case-insensitive search in name and info
        #[arg(long)]
        search: Option<String>,
        /// Only persons with a birthday
        #[arg(long)]
        with_birthday: bool,
    },
    /// Edit a person; omitted fields stay unchanged
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Birthday (YYYY-MM-DD), empty string clears it
        #[arg(long)]
        birthday: Option<String>,
        #[arg(long)]
        info: Option<String>,
    },
    /// Delete a person without ideas or gifts
    Rm { id: i64 },
}

#[derive(Subcommand)]
pub enum OccasionCommand {
    /// Add an occasion
    Add {
        name: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Free-text person label
        #[arg(long, default_value = "")]
        person: String,
        /// fixed or custom
        #[arg(long = "type", default_value = "custom")]
        occasion_type: String,
        #[arg(long, default_value = "")]
        info: String,
    },
    /// List occasions
    List(OccasionListArgs),
    /// Edit an occasion; omitted fields stay unchanged
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        person: Option<String>,
        #[arg(long = "type")]
        occasion_type: Option<String>,
        #[arg(long)]
        info: Option<String>,
    },
    /// Activate or deactivate an occasion
    Toggle { id: i64 },
    /// Delete a custom occasion
    Rm { id: i64 },
    /// Create the default occasions if none exist
    Defaults,
}

#[derive(Args)]
pub struct OccasionListArgs {
    /// 30, 90, any number of days, or "all"
    #[arg(long, default_value = "all")]
    timeframe: String,
    /// all, fixed or custom
    #[arg(long = "type", default_value = "all")]
    occasion_type: String,
    /// all, active or inactive
    #[arg(long, default_value = "all")]
    status: String,
    /// Search in name and person label
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand)]
pub enum IdeaCommand {
    /// Add a gift idea
    Add {
        person_id: i64,
        content: String,
        /// text, link or image
        #[arg(long = "type", default_value = "text")]
        idea_type: String,
        #[arg(long)]
        occasion: Option<i64>,
        /// offen, besorgt or erledigt
        #[arg(long, default_value = "offen")]
        status: String,
    },
    /// List gift ideas
    List {
        /// Only ideas of this person
        #[arg(long)]
        person: Option<i64>,
    },
    /// Edit a gift idea; omitted fields stay unchanged
    Edit {
        id: i64,
        #[arg(long)]
        content: Option<String>,
        #[arg(long = "type")]
        idea_type: Option<String>,
        #[arg(long)]
        person: Option<i64>,
        #[arg(long, conflicts_with = "no_occasion")]
        occasion: Option<i64>,
        /// Detach the occasion
        #[arg(long)]
        no_occasion: bool,
        #[arg(long)]
        status: Option<String>,
    },
    /// Set the status of a gift idea
    Status { id: i64, status: String },
    /// Delete a gift idea
    Rm { id: i64 },
    /// Turn an idea into a planned gift
    Convert {
        id: i64,
        /// Gift date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum GiftCommand {
    /// Add a gift
    Add {
        person_id: i64,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        note: String,
        #[arg(long)]
        occasion: Option<i64>,
        /// offen, besorgt or ueberreicht
        #[arg(long)]
        status: Option<String>,
        /// Record a gift that was already given
        #[arg(long)]
        past: bool,
    },
    /// List planned gifts
    List,
    /// List past gifts
    Past,
    /// Edit a gift; omitted fields stay unchanged
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        person: Option<i64>,
        #[arg(long)]
        occasion: Option<i64>,
        #[arg(long)]
        status: Option<String>,
        /// planned or past
        #[arg(long)]
        kind: Option<String>,
    },
    /// Set the status of a gift
    Status { id: i64, status: String },
    /// Delete a gift
    Rm { id: i64 },
}

#[derive(Subcommand)]
pub enum ShareCommand {
    /// Share all gift ideas of a person
    Person {
        person_id: i64,
        /// Lifetime in days
        #[arg(long)]
        ttl: Option<i64>,
    },
    /// Share a single gift idea
    Idea {
        idea_id: i64,
        #[arg(long)]
        ttl: Option<i64>,
    },
    /// Open a share link (no login needed)
    Show {
        /// Token or full share URL
        token: String,
    },
    /// List your share links
    List,
    /// Deactivate one of your share links
    Deactivate {
        /// Token or full share URL
        token: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{message} ({code})")]
    Share { code: &'static str, message: String },
    #[error("{0}")]
    InvalidArgument(String),
}

/// What every command handler needs
pub struct CliContext<'a> {
    pub db: &'a Database,
    pub auth: &'a dyn AuthProvider,
    pub config: &'a Config,
}

impl CliContext<'_> {
    fn uid(&self) -> Result<String, CliError> {
        Ok(require_uid(self.auth)?)
    }
}

fn type_filter(value: &str) -> Result<Option<OccasionType>, CliError> {
    match value.trim() {
        "all" => Ok(None),
        other => Ok(Some(parse_type(other)?)),
    }
}

fn print_gifts(gifts: &[Gift]) {
    if gifts.is_empty() {
        println!("Keine Geschenke vorhanden.");
        return;
    }
    for g in gifts {
        println!(
            "{:>4}  {}  {:<20}  {:<12}  {:<11}  {}",
            g.id.unwrap_or_default(),
            g.date,
            g.person_name,
            g.occasion_name,
            g.status,
            g.note
        );
    }
}

/// Handle login
pub fn handle_login(email: &str, password: &str, auth: &dyn AuthProvider) -> Result<(), CliError> {
    let user = auth.login(email, password)?;
    println!("Angemeldet als {} ({})", user.email, user.display_name());
    Ok(())
}

/// Handle logout
pub fn handle_logout(auth: &dyn AuthProvider) -> Result<(), CliError> {
    auth.logout()?;
    println!("Abgemeldet.");
    Ok(())
}

/// Handle whoami
pub fn handle_whoami(auth: &dyn AuthProvider) -> Result<(), CliError> {
    match auth.wait_for_user()? {
        Some(user) => println!("Angemeldet als {} (uid: {})", user.email, user.uid),
        None => println!("Nicht angemeldet."),
    }
    Ok(())
}

/// Handle the person subcommands
pub fn handle_person(command: PersonCommand, ctx: &CliContext) -> Result<(), CliError> {
    let uid = ctx.uid()?;
    match command {
        PersonCommand::Add { name, birthday, info } => {
            let id = persons::create_person(ctx.db, &uid, &PersonInput { name, birthday, info })?;
            println!("Person angelegt (ID: {})", id);
        }
        PersonCommand::List { search, with_birthday } => {
            let all = persons::list_persons(ctx.db, &uid)?;
            let filter = PersonFilter {
                query: search.unwrap_or_default(),
                only_with_birthday: with_birthday,
            };
            let shown = persons::filter_persons(&all, &filter);
            if shown.is_empty() {
                println!("Keine Personen gefunden.");
            }
            for p in shown {
                println!(
                    "{:>4}  {:<24}  {:<10}  {}",
                    p.id.unwrap_or_default(),
                    p.name,
                    p.birthday.as_deref().unwrap_or("-"),
                    p.info
                );
            }
        }
        PersonCommand::Edit { id, name, birthday, info } => {
            let current = persons::get_person(ctx.db, &uid, id)?;
            let input = PersonInput {
                name: name.unwrap_or(current.name),
                birthday: birthday.or(current.birthday),
                info: info.unwrap_or(current.info),
            };
            persons::update_person(ctx.db, &uid, id, &input)?;
            println!("Person {} aktualisiert.", id);
        }
        PersonCommand::Rm { id } => {
            persons::delete_person(ctx.db, &uid, id)?;
            println!("Person {} gelöscht.", id);
        }
    }
    Ok(())
}

/// Handle the occasion subcommands
pub fn handle_occasion(command: OccasionCommand, ctx: &CliContext) -> Result<(), CliError> {
    let uid = ctx.uid()?;
    match command {
        OccasionCommand::Add { name, date, person, occasion_type, info } => {
            let input = OccasionInput {
                name,
                date,
                person,
                occasion_type: parse_type(&occasion_type)?,
                info,
            };
            let id = occasions::create_occasion(ctx.db, &uid, &input)?;
            println!("Anlass angelegt (ID: {})", id);
        }
        OccasionCommand::List(args) => {
            occasions::ensure_default_occasions(ctx.db, &uid)?;
            let filter = OccasionFilter {
                query: args.search.unwrap_or_default(),
                timeframe: args
                    .timeframe
                    .parse::<Timeframe>()
                    .map_err(CliError::InvalidArgument)?,
                occasion_type: type_filter(&args.occasion_type)?,
                status: args
                    .status
                    .parse::<StatusFilter>()
                    .map_err(CliError::InvalidArgument)?,
            };
            let all = occasions::list_occasions(ctx.db, &uid)?;
            let today = today();
            let shown = occasions::filter_occasions(&all, &filter, today);
            if shown.is_empty() {
                println!("Keine Anlässe gefunden.");
            }
            for o in shown {
                let label = occasions::occasion_days_until(o, today)
                    .map(relative_day_label)
                    .unwrap_or_default();
                println!(
                    "{:>4}  {:<24}  {:<10}  {:<8}  {:<6}  {:<8}  {}",
                    o.id.unwrap_or_default(),
                    o.name,
                    o.date.as_deref().unwrap_or("-"),
                    label,
                    o.occasion_type,
                    if o.is_active { "aktiv" } else { "inaktiv" },
                    o.person
                );
            }
        }
        OccasionCommand::Edit { id, name, date, person, occasion_type, info } => {
            let patch = OccasionPatch {
                name,
                date,
                person,
                occasion_type: occasion_type.as_deref().map(parse_type).transpose()?,
                is_active: None,
                info,
            };
            occasions::update_occasion(ctx.db, &uid, id, &patch)?;
            println!("Anlass {} aktualisiert.", id);
        }
        OccasionCommand::Toggle { id } => {
            let active = occasions::toggle_occasion_active(ctx.db, &uid, id)?;
            println!("Anlass {} ist jetzt {}.", id, if active { "aktiv" } else { "deaktiviert" });
        }
        OccasionCommand::Rm { id } => {
            occasions::delete_occasion(ctx.db, &uid, id)?;
            println!("Anlass {} gelöscht.", id);
        }
        OccasionCommand::Defaults => {
            if occasions::ensure_default_occasions(ctx.db, &uid)? {
                println!("Standard-Anlässe angelegt.");
            } else {
                println!("Standard-Anlässe sind bereits vorhanden.");
            }
        }
    }
    Ok(())
}

/// Handle the idea subcommands
pub fn handle_idea(command: IdeaCommand, ctx: &CliContext) -> Result<(), CliError> {
    let uid = ctx.uid()?;
    match command {
        IdeaCommand::Add { person_id, content, idea_type, occasion, status } => {
            let input = IdeaInput {
                person_id,
                occasion_id: occasion,
                idea_type: parse_type(&idea_type)?,
                content,
                status: parse_status(&status)?,
            };
            let id = gift_ideas::create_gift_idea(ctx.db, &uid, &input)?;
            println!("Geschenkidee angelegt (ID: {})", id);
        }
        IdeaCommand::List { person } => {
            let ideas = match person {
                Some(pid) => gift_ideas::list_gift_ideas_by_person(ctx.db, &uid, pid)?,
                None => gift_ideas::list_gift_ideas(ctx.db, &uid)?,
            };
            if ideas.is_empty() {
                println!("Keine Geschenkideen vorhanden.");
            }
            for i in ideas {
                println!(
                    "{:>4}  {:<20}  {:<5}  {:<8}  {:<14}  {}",
                    i.id.unwrap_or_default(),
                    i.person_name,
                    i.idea_type,
                    i.status,
                    i.occasion_name,
                    i.content
                );
            }
        }
        IdeaCommand::Edit { id, content, idea_type, person, occasion, no_occasion, status } => {
            let patch = IdeaPatch {
                person_id: person,
                occasion_id: if no_occasion { Some(None) } else { occasion.map(Some) },
                idea_type: idea_type.as_deref().map(parse_type).transpose()?,
                content,
                status: status.as_deref().map(parse_status).transpose()?,
            };
            gift_ideas::update_gift_idea(ctx.db, &uid, id, &patch)?;
            println!("Geschenkidee {} aktualisiert.", id);
        }
        IdeaCommand::Status { id, status } => {
            let status: IdeaStatus = parse_status(&status)?;
            gift_ideas::set_gift_idea_status(ctx.db, &uid, id, status)?;
            println!("Geschenkidee {} ist jetzt {}.", id, status);
        }
        IdeaCommand::Rm { id } => {
            gift_ideas::delete_gift_idea(ctx.db, &uid, id)?;
            println!("Geschenkidee {} gelöscht.", id);
        }
        IdeaCommand::Convert { id, date, note } => {
            let gift_id = gifts::convert_idea_to_gift(ctx.db, &uid, id, &ConvertOptions { date, note })?;
            println!("Geschenk angelegt (ID: {}); Idee {} ist erledigt.", gift_id, id);
        }
    }
    Ok(())
}

/// Handle the gift subcommands
pub fn handle_gift(command: GiftCommand, ctx: &CliContext) -> Result<(), CliError> {
    let uid = ctx.uid()?;
    match command {
        GiftCommand::Add { person_id, date, note, occasion, status, past } => {
            let input = GiftInput {
                person_id,
                occasion_id: occasion,
                date: date.unwrap_or_else(get_current_date_string),
                note,
                status: status.as_deref().map(parse_status).transpose()?,
                kind: if past { GiftKind::Past } else { GiftKind::Planned },
            };
            let id = gifts::create_gift(ctx.db, &uid, &input)?;
            println!("Geschenk angelegt (ID: {})", id);
        }
        GiftCommand::List => print_gifts(&gifts::list_gifts(ctx.db, &uid)?),
        GiftCommand::Past => print_gifts(&gifts::list_past_gifts(ctx.db, &uid)?),
        GiftCommand::Edit { id, date, note, person, occasion, status, kind } => {
            let patch = GiftPatch {
                person_id: person,
                occasion_id: occasion.map(Some),
                date,
                note,
                status: status.as_deref().map(parse_status).transpose()?,
                kind: kind.as_deref().map(parse_type).transpose()?,
            };
            gifts::update_gift(ctx.db, &uid, id, &patch)?;
            println!("Geschenk {} aktualisiert.", id);
        }
        GiftCommand::Status { id, status } => {
            let status: GiftStatus = parse_status(&status)?;
            gifts::set_gift_status(ctx.db, &uid, id, status)?;
            println!("Geschenk {} ist jetzt {}.", id, status);
        }
        GiftCommand::Rm { id } => {
            gifts::delete_gift(ctx.db, &uid, id)?;
            println!("Geschenk {} gelöscht.", id);
        }
    }
    Ok(())
}

/// Markdown for the public view of a resolved link
pub fn render_shared_view(link: &ShareLink) -> String {
    let who = if link.person_name.trim().is_empty() { &link.person_id } else { &link.person_name };
    let header = match link.kind {
        ShareKind::GiftIdeasByPerson => format!("Geschenkideen für: {}", who),
        ShareKind::GiftIdea => format!("Geteilte Geschenkidee für: {}", who),
    };
    let items = link.content.items();
    let mut md = format!("# {}\n\n", header);
    if items.is_empty() {
        md.push_str("Keine Geschenkideen vorhanden.\n");
        return md;
    }
    md.push_str("|Typ|Anlass|Status|Inhalt|\n|-|-|-|-|\n");
    for item in items {
        let cell = |s: &str| s.replace('|', "/").replace('\n', " ");
        md.push_str(&format!(
            "|{}|{}|{}|{}|\n",
            cell(&item.idea_type),
            cell(if item.occasion_name.is_empty() { "-" } else { &item.occasion_name }),
            cell(&item.status),
            cell(&truncate_chars(&item.content, SHARED_CONTENT_MAX_CHARS)),
        ));
    }
    md
}

/// Handle the share subcommands
pub fn handle_share(command: ShareCommand, ctx: &CliContext) -> Result<(), CliError> {
    match command {
        ShareCommand::Show { token } => {
            // Public read path: no login
            match share::resolve_share_token(ctx.db, &share::token_from_input(&token)) {
                Ok(link) => MadSkin::default().print_text(&render_shared_view(&link)),
                Err(e) => {
                    return Err(match e.share_code() {
                        Some(code) => CliError::Share { code, message: e.to_string() },
                        None => CliError::Service(e),
                    });
                }
            }
        }
        ShareCommand::Person { person_id, ttl } => {
            let uid = ctx.uid()?;
            let person = persons::get_person(ctx.db, &uid, person_id)?;
            let url = share::create_share_link_gift_ideas_by_person(
                ctx.db,
                &uid,
                &ctx.config.share,
                person_id,
                &person.name,
                ttl,
            )?;
            println!("{}", url);
        }
        ShareCommand::Idea { idea_id, ttl } => {
            let uid = ctx.uid()?;
            let url = share::create_share_link_gift_idea(ctx.db, &uid, &ctx.config.share, idea_id, ttl)?;
            println!("{}", url);
        }
        ShareCommand::List => {
            let uid = ctx.uid()?;
            let links = share::list_share_links(ctx.db, &uid)?;
            if links.is_empty() {
                println!("Keine Links vorhanden.");
            }
            for link in links {
                let expires = chrono::DateTime::from_timestamp_millis(link.record.expires_at)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<11}  {:<17}  {:<20}  bis {}  {}",
                    link.state,
                    link.record.kind,
                    link.record.person_name,
                    expires,
                    link.url(&ctx.config.share)
                );
            }
        }
        ShareCommand::Deactivate { token } => {
            let uid = ctx.uid()?;
            share::deactivate_share_link(ctx.db, &uid, &share::token_from_input(&token))?;
            println!("Link deaktiviert.");
        }
    }
    Ok(())
}

/// Handle suggest: print suggestions, optionally adopting one
pub fn handle_suggest(person_id: i64, adopt: Option<usize>, ctx: &CliContext) -> Result<(), CliError> {
    let uid = ctx.uid()?;
    let list = suggestions::suggest_for_person(ctx.db, &uid, person_id)?;

    if let Some(n) = adopt {
        let chosen = n
            .checked_sub(1)
            .and_then(|i| list.get(i))
            .ok_or_else(|| CliError::InvalidArgument(format!("Kein Vorschlag Nummer {}.", n)))?;
        let id = suggestions::adopt_suggestion(ctx.db, &uid, chosen)?;
        println!("Vorschlag \"{}\" als Geschenkidee übernommen (ID: {})", chosen.content, id);
        return Ok(());
    }

    for (i, s) in list.iter().enumerate() {
        println!("{:>2}. {:<20}  {}", i + 1, s.content, s.reason);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PublicIdeaSnapshot, ShareContent};

    fn snapshot(content: &str) -> PublicIdeaSnapshot {
        PublicIdeaSnapshot {
            id: 1,
            idea_type: "text".to_string(),
            content: content.to_string(),
            status: "offen".to_string(),
            occasion_name: String::new(),
            person_id: "1".to_string(),
            person_name: "Anna".to_string(),
        }
    }

    fn link(kind: ShareKind, content: ShareContent) -> ShareLink {
        ShareLink {
            token: "t".to_string(),
            uid: "u1".to_string(),
            kind,
            person_id: "1".to_string(),
            person_name: "Anna".to_string(),
            idea_id: None,
            content,
            expires_at: 1,
            is_active: true,
        }
    }

    #[test]
    fn cli_parses_nested_commands() {
        let cli = Cli::try_parse_from(["gifts", "--dev", "share", "person", "3", "--ttl", "7"]).unwrap();
        assert!(cli.dev);
        assert!(matches!(
            cli.command,
            Some(Commands::Share(ShareCommand::Person { person_id: 3, ttl: Some(7) }))
        ));

        let cli = Cli::try_parse_from(["gifts", "idea", "add", "1", "https://x.de", "--type", "link"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Idea(IdeaCommand::Add { .. }))));

        assert!(Cli::try_parse_from(["gifts", "occasion", "add", "Party"]).is_err());
    }

    #[test]
    fn shared_view_headers() {
        let many = link(ShareKind::GiftIdeasByPerson, ShareContent::Items { items: vec![snapshot("Buch")] });
        let md = render_shared_view(&many);
        assert!(md.starts_with("# Geschenkideen für: Anna"));
        assert!(md.contains("|text|-|offen|Buch|"));

        let one = link(ShareKind::GiftIdea, ShareContent::Item { item: snapshot("a|b") });
        let md = render_shared_view(&one);
        assert!(md.starts_with("# Geteilte Geschenkidee für: Anna"));
        assert!(md.contains("a/b"));
    }

    #[test]
    fn shared_view_header_falls_back_to_person_id() {
        let mut unnamed = link(ShareKind::GiftIdeasByPerson, ShareContent::Items { items: vec![] });
        unnamed.person_name = String::new();
        let md = render_shared_view(&unnamed);
        assert!(md.starts_with(&format!("# Geschenkideen für: {}", unnamed.person_id)));
    }

    #[test]
    fn shared_view_truncates_long_content() {
        let long = "x".repeat(500);
        let md = render_shared_view(&link(
            ShareKind::GiftIdea,
            ShareContent::Item { item: snapshot(&long) },
        ));
        assert!(md.contains(&format!("{}...", "x".repeat(237))));
        assert!(!md.contains(&"x".repeat(241)));
    }
}
