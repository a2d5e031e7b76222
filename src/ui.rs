// UI layer: interactive terminal menu built on `dialoguer`, with an
// `indicatif` spinner while requests run and `crossterm` colours for
// rarities. All decisions live in the shell; this module only prompts
// and prints.

use crate::api::GameApi;
use crate::catalog;
use crate::models::{AthleteCard, Difficulty, Rarity};
use crate::session::SessionStore;
use crate::shell::{Notice, Shell};
use crate::views::{self, WeeklyProgress};
use anyhow::Result;
use crossterm::style::{StyledContent, Stylize};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::{Duration, Instant};

/// Main interactive menu. Runs until the player picks "Exit".
pub fn main_menu<A: GameApi, S: SessionStore>(shell: &mut Shell<A, S>) -> Result<()> {
    let mut visits = 0usize;
    loop {
        print_notices(shell);
        if !shell.state().is_authenticated() {
            let items = ["Login", "Exit"];
            match Select::new().items(&items).default(0).interact()? {
                0 => handle_login(shell)?,
                _ => break,
            }
            continue;
        }

        print_header(shell);
        let items = [
            "Training",
            "Collection",
            "Profile",
            "Leaderboard",
            "Refresh",
            "Logout",
            "Exit",
        ];
        match Select::new().items(&items).default(0).interact()? {
            0 => {
                handle_training(shell, visits)?;
                visits += 1;
            }
            1 => show_collection(shell),
            2 => show_profile(shell),
            3 => show_leaderboard(shell),
            4 => {
                let spinner = spinner("Loading...");
                shell.refresh();
                spinner.finish_and_clear();
            }
            5 => {
                if Confirm::new().with_prompt("Remove saved session?").interact()? {
                    shell.logout();
                }
            }
            _ => break,
        }
    }
    Ok(())
}

fn spinner(msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").expect("static template"));
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn handle_login<A: GameApi, S: SessionStore>(shell: &mut Shell<A, S>) -> Result<()> {
    println!("Enter your phone number to sign in or register");
    let phone: String = Input::new()
        .with_prompt("Phone number")
        .allow_empty(true)
        .interact_text()?;
    let spinner = spinner("Signing in...");
    shell.login(&phone);
    spinner.finish_and_clear();
    Ok(())
}

fn handle_training<A: GameApi, S: SessionStore>(
    shell: &mut Shell<A, S>,
    visit: usize,
) -> Result<()> {
    let progress = shell.state().weekly_progress();
    println!("Weekly goal: {} {}", progress_bar(progress), progress);
    if progress.bonus_on_next_workout() {
        println!("{}", "Weekly bonus available on your next workout!".yellow());
    }
    println!("{}", catalog::tip(visit).italic());

    let levels: Vec<Difficulty> = Difficulty::all().collect();
    let items: Vec<String> = levels.iter().map(|d| difficulty_line(*d)).collect();
    let default = shell
        .state()
        .selected_difficulty()
        .map(|d| (d.level() - Difficulty::MIN) as usize)
        .unwrap_or(0);
    let choice = Select::new()
        .with_prompt("Difficulty")
        .items(&items)
        .default(default)
        .interact()?;
    shell.select_difficulty(levels[choice]);

    if !Confirm::new().with_prompt("Start workout?").default(true).interact()? {
        return Ok(());
    }

    let spinner = spinner("Training...");
    let started = shell.complete_workout(Instant::now());
    spinner.finish_and_clear();
    if !started {
        return Ok(());
    }

    let flipping = self::spinner("Flipping card...");
    while shell.state().reveal().is_revealing() {
        if shell.poll_reveal(Instant::now()) {
            break;
        }
        let wait = shell
            .state()
            .reveal()
            .remaining(Instant::now())
            .unwrap_or_default();
        thread::sleep(wait.max(Duration::from_millis(10)));
    }
    flipping.finish_and_clear();

    if let Some(card) = shell.state().reveal().card() {
        print_card(card, true);
    }
    shell.dismiss_reveal();
    Ok(())
}

fn difficulty_line(d: Difficulty) -> String {
    let (title, desc) = catalog::difficulty_info(d);
    let chances = catalog::chances(d);
    let odds: Vec<String> = Rarity::ALL
        .iter()
        .map(|r| format!("{} {}%", r.label(), chances.for_rarity(*r)))
        .collect();
    format!("{}. {} - {} [{}]", d.level(), title, desc, odds.join(" | "))
}

fn progress_bar(progress: WeeklyProgress) -> String {
    let filled = (progress.fraction() * progress.target as f64).round() as u32;
    (0..progress.target)
        .map(|i| if i < filled { '■' } else { '□' })
        .collect()
}

fn rarity_styled(rarity: Rarity) -> StyledContent<&'static str> {
    match rarity {
        Rarity::Common => rarity.label().grey(),
        Rarity::Rare => rarity.label().blue().bold(),
        Rarity::Epic => rarity.label().magenta().bold(),
    }
}

fn print_card(card: &AthleteCard, fresh: bool) {
    let image = card
        .image_url
        .as_deref()
        .unwrap_or_else(|| catalog::sport_emoji(&card.sport));
    let points = if fresh {
        format!("+{} points", card.rarity.points())
    } else {
        format!("{} points", card.rarity.points())
    };
    println!(
        "{} {} [{}] - {}",
        image,
        card.name.clone().bold(),
        rarity_styled(card.rarity),
        card.sport
    );
    println!("    {}", card.fact);
    match views::obtained_label(card) {
        Some(date) => println!("    ★ {}  ({})", points, date),
        None => println!("    ★ {}", points),
    }
}

fn print_header<A: GameApi, S: SessionStore>(shell: &Shell<A, S>) {
    let state = shell.state();
    println!(
        "{}  {} points  |  week {}  |  {} cards",
        "SportCards".bold(),
        state.total_points(),
        state.weekly_progress(),
        state.cards().len()
    );
}

fn show_collection<A: GameApi, S: SessionStore>(shell: &Shell<A, S>) {
    let state = shell.state();
    let counts = state.rarity_counts();
    println!(
        "{}: {}   {}: {}   {}: {}",
        rarity_styled(Rarity::Common),
        counts.common,
        rarity_styled(Rarity::Rare),
        counts.rare,
        rarity_styled(Rarity::Epic),
        counts.epic
    );
    if state.cards().is_empty() {
        println!("No cards yet. Finish a workout to get your first one!");
        return;
    }
    for card in state.cards() {
        print_card(card, false);
    }
}

fn show_profile<A: GameApi, S: SessionStore>(shell: &Shell<A, S>) {
    let state = shell.state();
    if let Some(session) = state.session() {
        println!("Phone: {}", views::masked_phone(&session.phone));
    }
    println!("Total points: {}", state.total_points());
    println!("Cards collected: {}", state.cards().len());
    println!("Workouts this week: {}", state.weekly_progress());
    let counts = state.rarity_counts();
    for rarity in Rarity::ALL {
        println!("  {} cards: {}", rarity_styled(rarity), counts.get(rarity));
    }
}

fn show_leaderboard<A: GameApi, S: SessionStore>(shell: &Shell<A, S>) {
    println!("{}", "Global leaderboard".bold());
    for row in shell.state().leaderboard_rows() {
        let line = format!(
            "#{:<3} {:<10} {:>6} pts {:>4} cards",
            row.entry.rank, row.label, row.entry.points, row.entry.card_count
        );
        if row.is_current_user {
            println!("{}", line.reverse().bold());
        } else {
            println!("{}", line);
        }
    }
}

fn print_notices<A: GameApi, S: SessionStore>(shell: &mut Shell<A, S>) {
    for notice in shell.drain_notices() {
        let title = if notice.is_error() {
            notice.title().red().bold()
        } else if notice == Notice::WeeklyBonus {
            notice.title().yellow().bold()
        } else {
            notice.title().green().bold()
        };
        println!("{} {}", title, notice.message());
    }
}
