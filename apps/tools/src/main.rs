use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use board::{Board, ClockTierIds, DragId, Item, PartitionState, Scenario, Topic};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use shared::{
    domain::{RankingId, DEFAULT_TOPIC},
    protocol::Ranking,
};
use storage::{Storage, StoredRanking};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://rankings.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List predefined topics.
    Topics,
    /// List stored ranking ids.
    List,
    /// Create a ranking from a topic's default items.
    Create {
        #[arg(long, default_value = DEFAULT_TOPIC)]
        topic: String,
    },
    /// Print a ranking, optionally next to a friend's.
    Show {
        id: RankingId,
        /// Ranking to print alongside.
        other: Option<RankingId>,
        /// Print alongside the ranking this one is linked to.
        #[arg(long, conflicts_with = "other")]
        linked: bool,
    },
    /// Drag ACTIVE onto OVER. Tokens: `tier:N` (1-based rank), `pool`,
    /// `new-tier`, `item:TEXT`, or plain item text. Leaving OVER out
    /// cancels the drag.
    Drag {
        id: RankingId,
        active: String,
        over: Option<String>,
    },
    /// Add a custom item to the unranked pool.
    Add {
        id: RankingId,
        value: String,
    },
    /// Delete an unranked item.
    Remove {
        id: RankingId,
        value: String,
    },
    /// Switch topic, discarding the current ranking.
    Topic {
        id: RankingId,
        topic: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Prepare an empty ranking for a friend and link it to ORIGIN.
    Invite {
        origin: RankingId,
    },
    /// Start a ranking from every item of someone else's ranking.
    Seed {
        origin: RankingId,
        /// Fill this existing ranking (usually an invite) instead of creating one.
        #[arg(long)]
        into: Option<RankingId>,
        /// Overwrite ranked tiers in the target without asking.
        #[arg(long)]
        yes: bool,
    },
}

/// Whether a save may silently replace ranked tiers already stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overwrite {
    Confirm,
    /// Edits of the record just loaded, and metadata-only updates.
    Skip,
}

/// A loaded ranking with its storage timestamps.
struct View {
    board: Board,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let mut tier_ids = ClockTierIds::default();

    match cli.command {
        Command::Topics => {
            for (key, display_name) in Topic::predefined() {
                println!("{key:<20} {display_name}");
            }
        }
        Command::List => {
            for id in storage.list_ranking_ids().await? {
                println!("{id}");
            }
        }
        Command::Create { topic } => {
            let topic = Topic::new(topic);
            if !topic.is_predefined() {
                println!("'{}' is a custom topic and starts empty; fill it with `add`", topic.key());
            }
            let board = Board::from_topic(topic);
            let id = storage.create_ranking(&board.to_record()).await?;
            println!("created ranking_id={id}");
            print_board(&board);
        }
        Command::Show { id, other, linked } => {
            let (mine, theirs) = load_comparison(&storage, id, other, linked, &mut tier_ids).await?;
            print_comparison(&mine, theirs.as_ref());
        }
        Command::Drag { id, active, over } => {
            let mut board = load_board(&storage, id, &mut tier_ids).await?;
            let active = parse_drag_id(&active, board.state())?;
            let over = over
                .map(|token| parse_drag_id(&token, board.state()))
                .transpose()?;
            let scenario = board.drag_end(&active, over.as_ref(), &mut tier_ids);
            println!("{}", describe(&scenario, board.state()));
            if !scenario.is_inert() {
                save_board(&storage, id, &board).await?;
            }
            print_board(&board);
        }
        Command::Add { id, value } => {
            let mut board = load_board(&storage, id, &mut tier_ids).await?;
            board
                .add_item(&value)
                .with_context(|| format!("could not add '{}'", value.trim()))?;
            save_board(&storage, id, &board).await?;
            print_board(&board);
        }
        Command::Remove { id, value } => {
            let mut board = load_board(&storage, id, &mut tier_ids).await?;
            let item = Item::new(value.trim());
            if !board.state().contains_item(&item) {
                bail!("'{item}' is not in this ranking");
            }
            board.delete_item(&item)?;
            save_board(&storage, id, &board).await?;
            print_board(&board);
        }
        Command::Topic { id, topic, yes } => {
            let mut board = load_board(&storage, id, &mut tier_ids).await?;
            let confirm = || {
                yes || confirm_on_stdin(
                    "Loading a new topic will clear your current ranking progress. Are you sure?",
                )
            };
            if board.change_topic(Topic::new(topic), confirm, &mut rand::thread_rng()) {
                save_board(&storage, id, &board).await?;
                print_board(&board);
            } else {
                println!("kept topic {}", board.topic());
            }
        }
        Command::Invite { origin } => {
            let target = invite_friend(&storage, origin).await?;
            println!("created ranking_id={target} for a friend of {origin}");
            println!("they fill it with: seed {origin} --into {target}");
        }
        Command::Seed { origin, into, yes } => match into {
            Some(target) => {
                let confirm = || {
                    yes || confirm_on_stdin(
                        "This ranking already has ranked items. Are you sure you want to overwrite them?",
                    )
                };
                match seed_into(&storage, origin, target, confirm).await? {
                    Some(board) => {
                        println!("seeded ranking_id={target} from {origin}");
                        print_board(&board);
                    }
                    None => println!("left ranking {target} unchanged"),
                }
            }
            None => {
                let board = seeded_board(&fetch(&storage, origin).await?, origin);
                let id = storage.create_ranking(&board.to_record()).await?;
                println!("created ranking_id={id} seeded from {origin}");
                print_board(&board);
            }
        },
    }

    Ok(())
}

async fn fetch(storage: &Storage, id: RankingId) -> Result<StoredRanking> {
    storage
        .load_ranking(id)
        .await?
        .ok_or_else(|| anyhow!("ranking {id} not found"))
}

async fn load_view(storage: &Storage, id: RankingId, tier_ids: &mut ClockTierIds) -> Result<View> {
    let stored = fetch(storage, id).await?;
    let board = Board::from_saved(&stored.ranking, tier_ids)
        .with_context(|| format!("ranking {id} is corrupt"))?;
    Ok(View {
        board,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
    })
}

async fn load_board(storage: &Storage, id: RankingId, tier_ids: &mut ClockTierIds) -> Result<Board> {
    Ok(load_view(storage, id, tier_ids).await?.board)
}

/// Loads `id` and the ranking to compare it with, if any.
async fn load_comparison(
    storage: &Storage,
    id: RankingId,
    other: Option<RankingId>,
    linked: bool,
    tier_ids: &mut ClockTierIds,
) -> Result<(View, Option<View>)> {
    let mine = load_view(storage, id, tier_ids).await?;
    let theirs = match companion_id(&mine.board, other, linked)? {
        Some(other) => Some(load_view(storage, other, tier_ids).await?),
        None => None,
    };
    Ok((mine, theirs))
}

fn companion_id(board: &Board, other: Option<RankingId>, linked: bool) -> Result<Option<RankingId>> {
    if !linked {
        return Ok(other);
    }
    board
        .linked_ids()
        .first()
        .copied()
        .map(Some)
        .ok_or_else(|| anyhow!("this ranking is not linked to another one yet; see `invite`"))
}

/// Writes `record` over ranking `id`. Returns false when the user declined
/// to replace ranked tiers.
async fn save_record<F>(
    storage: &Storage,
    id: RankingId,
    record: &Ranking,
    overwrite: Overwrite,
    confirm: F,
) -> Result<bool>
where
    F: FnOnce() -> bool,
{
    if overwrite == Overwrite::Confirm {
        let existing = storage.load_ranking(id).await?;
        if existing.is_some_and(|stored| stored.ranking.has_ranked_items()) && !confirm() {
            return Ok(false);
        }
    }
    if !storage.update_ranking(id, record).await? {
        bail!("ranking {id} not found");
    }
    Ok(true)
}

async fn save_board(storage: &Storage, id: RankingId, board: &Board) -> Result<()> {
    save_record(storage, id, &board.to_record(), Overwrite::Skip, || true).await?;
    Ok(())
}

/// Creates the empty ranking a friend will fill in and points `origin` at it,
/// replacing any earlier link.
async fn invite_friend(storage: &Storage, origin: RankingId) -> Result<RankingId> {
    let mut record = fetch(storage, origin).await?.ranking;
    let target = storage.create_ranking(&Ranking::default()).await?;
    record.other_ranking_ids = vec![target];
    save_record(storage, origin, &record, Overwrite::Skip, || true).await?;
    Ok(target)
}

fn seeded_board(origin_record: &StoredRanking, origin: RankingId) -> Board {
    let mut board = Board::seeded_from(&origin_record.ranking);
    board.set_linked_ids(vec![origin]);
    board
}

/// Fills `target` with a board seeded from `origin`. Returns `None` when the
/// target already had ranked tiers and `confirm` declined.
async fn seed_into<F>(
    storage: &Storage,
    origin: RankingId,
    target: RankingId,
    confirm: F,
) -> Result<Option<Board>>
where
    F: FnOnce() -> bool,
{
    let board = seeded_board(&fetch(storage, origin).await?, origin);
    let saved = save_record(storage, target, &board.to_record(), Overwrite::Confirm, confirm).await?;
    Ok(saved.then_some(board))
}

fn parse_drag_id(token: &str, state: &PartitionState) -> Result<DragId> {
    let token = token.trim();
    if let Some(text) = token.strip_prefix("item:") {
        return Ok(DragId::item(text));
    }
    match token {
        "new-tier" => Ok(DragId::NewTier),
        "pool" => Ok(DragId::pool()),
        _ => match token.strip_prefix("tier:") {
            Some(rank) => {
                let rank: usize = rank
                    .parse()
                    .with_context(|| format!("'{rank}' is not a tier rank"))?;
                let tier = rank
                    .checked_sub(1)
                    .and_then(|index| state.tier_order().get(index))
                    .ok_or_else(|| anyhow!("there is no tier ranked {rank}"))?;
                Ok(DragId::tier(*tier))
            }
            None => Ok(DragId::item(token)),
        },
    }
}

/// `state` is the board after the drag was applied.
fn describe(scenario: &Scenario, state: &PartitionState) -> String {
    match scenario {
        Scenario::Reject => "a tier cannot become a new tier; nothing changed".into(),
        Scenario::ReorderTiers { active, .. } => match state.rank_of(*active) {
            Some(rank) => format!("moved tier to rank {rank}"),
            None => "moved tier".into(),
        },
        Scenario::SpawnTier { item, .. } => format!("'{item}' now has its own tier"),
        Scenario::ReorderWithinContainer { active, over, .. } => {
            format!("moved '{active}' to where '{over}' was")
        }
        Scenario::MoveBetweenContainers { item, .. } => format!("moved '{item}'"),
        Scenario::NoOp => "nothing to do".into(),
    }
}

fn print_board(board: &Board) {
    println!("topic: {}", board.topic());
    print_tiers(board);
}

fn print_comparison(mine: &View, theirs: Option<&View>) {
    println!("{}", mine.board.topic().display_name());
    print_view("You", mine);
    if let Some(theirs) = theirs {
        println!();
        print_view("Them", theirs);
    }
}

fn print_view(title: &str, view: &View) {
    println!(
        "== {title} (created {}, updated {})",
        view.created_at.format("%Y-%m-%d %H:%M"),
        view.updated_at.format("%Y-%m-%d %H:%M"),
    );
    print_tiers(&view.board);
}

fn print_tiers(board: &Board) {
    let state = board.state();
    if state.tier_order().is_empty() {
        println!("No ranked items yet.");
    }
    for (rank, (_, items)) in state.tiers().enumerate() {
        let names: Vec<&str> = items.iter().map(Item::as_str).collect();
        println!("  {:>2}. {}", rank + 1, names.join(", "));
    }
    if !state.pool().is_empty() {
        let pool: Vec<&str> = state.pool().iter().map(Item::as_str).collect();
        println!("unranked: {}", pool.join(", "));
    }
}

fn confirm_on_stdin(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
