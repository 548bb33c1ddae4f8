//! Interactive session that drives the views through location history.

use anyhow::{Context, Result};
use std::str::FromStr;
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::client::RecipeClient;
use crate::detail::DetailPage;
use crate::listing::ListingPage;
use crate::location::{commit_search, Location, Navigator, Route};
use crate::runtime::{render, report};

const HELP: &str = "\
commands:
  search <term>   search by name (empty term shows everything)
  next | prev     change page
  page <n>        jump to page n
  open <n>        open the n-th recipe on this page
  go <location>   follow a direct link, e.g. /menu?s=pie&page=2
  back | forward  move through history
  menu | home     go to the listing or landing page
  help            show this text
  quit            leave the shell
";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Submit a search term.
    Search(String),
    /// Next page.
    Next,
    /// Previous page.
    Previous,
    /// Jump to a page.
    Page(usize),
    /// Open the n-th card on the page.
    Open(usize),
    /// Direct link.
    Go(String),
    /// History back.
    Back,
    /// History forward.
    Forward,
    /// Bare listing.
    Menu,
    /// Landing page.
    Home,
    /// Show help.
    Help,
    /// Exit.
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));
        let number = |what: &str| {
            rest.parse::<usize>()
                .map_err(|_| format!("{what} needs a number, got '{rest}'"))
        };
        match verb.to_ascii_lowercase().as_str() {
            "search" | "s" => Ok(Self::Search(rest.to_string())),
            "next" | "n" => Ok(Self::Next),
            "prev" | "previous" | "p" => Ok(Self::Previous),
            "page" => number("page").map(Self::Page),
            "open" | "o" => number("open").map(Self::Open),
            "go" if !rest.is_empty() => Ok(Self::Go(rest.to_string())),
            "go" => Err("go needs a location".to_string()),
            "back" | "b" => Ok(Self::Back),
            "forward" | "f" => Ok(Self::Forward),
            "menu" => Ok(Self::Menu),
            "home" => Ok(Self::Home),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}' (try 'help')")),
        }
    }
}

/// Result of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The location changed and was rendered.
    Rendered(String),
    /// The location did not change.
    Stayed(String),
    /// The session should end.
    Quit,
}

/// Mounted views plus history.
pub struct Session {
    navigator: Navigator,
    listing: ListingPage,
    detail: DetailPage,
    json: bool,
}

impl Session {
    /// Creates a session positioned at `start`. Nothing is fetched until [`Session::render`].
    pub fn new(client: RecipeClient, start: Location, json: bool) -> Self {
        Self {
            navigator: Navigator::new(start),
            listing: ListingPage::new(client.clone()),
            detail: DetailPage::new(client),
            json,
        }
    }

    /// Location currently shown.
    pub fn location(&self) -> &Location {
        self.navigator.current()
    }

    /// Read path for the current location.
    pub async fn render(&mut self) -> Result<String> {
        let location = self.navigator.current().clone();
        match self.navigator.route() {
            Route::Home => {
                self.listing.leave();
                self.detail.leave();
                Ok("Welcome to mealscout. Type 'menu' to browse recipes.\n".to_string())
            }
            Route::Listing(_) => {
                self.detail.leave();
                let view = self.listing.load_with_progress(&location, report).await;
                render(view, self.json)
            }
            Route::Detail(_) => {
                self.listing.leave();
                let view = self.detail.load_with_progress(&location, report).await;
                render(view, self.json)
            }
            Route::NotFound(path) => {
                self.listing.leave();
                self.detail.leave();
                Ok(format!("Page not found: {path}\n"))
            }
        }
    }

    /// Applies one command, rendering when the location changed.
    pub async fn apply(&mut self, command: ShellCommand) -> Result<Step> {
        let on_listing = matches!(self.navigator.route(), Route::Listing(_));
        let next = match command {
            ShellCommand::Quit => return Ok(Step::Quit),
            ShellCommand::Help => return Ok(Step::Stayed(HELP.to_string())),
            ShellCommand::Search(term) => {
                let from = if on_listing {
                    self.navigator.current().clone()
                } else {
                    Location::listing()
                };
                commit_search(&from, &term)
            }
            ShellCommand::Next | ShellCommand::Previous
                if on_listing && self.listing.pager().is_none() =>
            {
                return Ok(stay("No results to page through."));
            }
            ShellCommand::Next if on_listing => match self.listing.next_location() {
                Some(next) => next,
                None => return Ok(stay("Already on the last page.")),
            },
            ShellCommand::Previous if on_listing => match self.listing.previous_location() {
                Some(previous) => previous,
                None => return Ok(stay("Already on the first page.")),
            },
            ShellCommand::Page(page) if on_listing => self.listing.page_location(page),
            ShellCommand::Open(position) if on_listing => {
                match self.listing.card_location(position) {
                    Some(detail) => detail,
                    None => return Ok(stay(&format!("No recipe {position} on this page."))),
                }
            }
            ShellCommand::Next
            | ShellCommand::Previous
            | ShellCommand::Page(_)
            | ShellCommand::Open(_) => return Ok(stay("Only available on the recipe listing.")),
            ShellCommand::Go(target) => match Location::parse(&target) {
                Ok(location) => location,
                Err(err) => return Ok(stay(&format!("Invalid location '{target}': {err}"))),
            },
            ShellCommand::Back => {
                if self.navigator.back().is_none() {
                    return Ok(stay("Nothing to go back to."));
                }
                return self.render().await.map(Step::Rendered);
            }
            ShellCommand::Forward => {
                if self.navigator.forward().is_none() {
                    return Ok(stay("Nothing to go forward to."));
                }
                return self.render().await.map(Step::Rendered);
            }
            ShellCommand::Menu => Location::listing(),
            ShellCommand::Home => Location::home(),
        };

        self.navigator.commit(next);
        self.render().await.map(Step::Rendered)
    }
}

fn stay(message: &str) -> Step {
    Step::Stayed(format!("{message}\n"))
}

/// Runs the interactive loop on stdin/stdout until `quit` or end of input.
pub async fn run(client: RecipeClient, start: Location, json: bool) -> Result<()> {
    let mut session = Session::new(client, start, json);
    let mut out = stdout();
    let first = session.render().await?;
    write_block(&mut out, &session, &first).await?;

    let mut lines = BufReader::new(stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let text = match line.parse::<ShellCommand>() {
            Ok(command) => match session.apply(command).await? {
                Step::Quit => break,
                Step::Rendered(text) | Step::Stayed(text) => text,
            },
            Err(message) if message.is_empty() => String::new(),
            Err(message) => format!("{message}\n"),
        };
        write_block(&mut out, &session, &text).await?;
    }
    Ok(())
}

async fn write_block(out: &mut tokio::io::Stdout, session: &Session, text: &str) -> Result<()> {
    let block = format!("{text}[{}] > ", session.location());
    out.write_all(block.as_bytes())
        .await
        .context("failed to write stdout")?;
    out.flush().await.context("failed to flush stdout")
}
