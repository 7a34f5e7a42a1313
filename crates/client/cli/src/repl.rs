//! Line commands understood by the terminal driver.
//!
//! Chat lines (starting with `/` or `!`) go to the engine untouched; the rest
//! drive the simulated scene and map.
use anyhow::{Context, Result, bail};

use anim_core::{EntityId, Point};

#[derive(Clone, Debug, PartialEq)]
pub enum ReplCommand {
    Chat(String),
    Click(Point),
    Select(Vec<EntityId>),
    Target(Vec<EntityId>),
    Actor(Option<EntityId>),
    Tokens,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
/anim ...          run an animation command (prefix with ! for quiet mode)
click <x>,<y>      click the map at a point
select <id>...     select tokens (no ids clears)
target <id>...     target tokens (no ids clears)
actor [<id>]       set or clear the last acting token
tokens             list tokens in the scene
help               show this help
quit               exit";

impl ReplCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Self::Empty);
        }
        if line.starts_with('/') || line.starts_with('!') {
            return Ok(Self::Chat(line.to_string()));
        }

        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        match verb {
            "click" => parse_point(&args.join(" ")).map(Self::Click),
            "select" => parse_ids(&args).map(Self::Select),
            "target" => parse_ids(&args).map(Self::Target),
            "actor" => match args.as_slice() {
                [] => Ok(Self::Actor(None)),
                [id] => Ok(Self::Actor(Some(parse_id(id)?))),
                _ => bail!("actor takes at most one id"),
            },
            "tokens" => Ok(Self::Tokens),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => bail!("unknown command '{}' (try 'help')", other),
        }
    }
}

fn parse_point(text: &str) -> Result<Point> {
    let (x, y) = text
        .split_once(',')
        .or_else(|| text.split_once(' '))
        .context("expected a point like 120,340")?;
    let x = x.trim().parse().context("invalid x coordinate")?;
    let y = y.trim().parse().context("invalid y coordinate")?;
    Ok(Point::new(x, y))
}

fn parse_id(text: &str) -> Result<EntityId> {
    text.parse()
        .map(EntityId)
        .with_context(|| format!("invalid token id '{}'", text))
}

fn parse_ids(args: &[&str]) -> Result<Vec<EntityId>> {
    args.iter().map(|arg| parse_id(arg)).collect()
}
