use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use engine::api;
use engine::{skills_for, Archetype, Battle, BattleState, Character, LogEntry, Rng, Roster, Skill};

#[derive(Copy, Clone, ValueEnum)]
enum ArchetypeArg {
    Warrior,
    Mage,
    Archer,
}

impl From<ArchetypeArg> for Archetype {
    fn from(value: ArchetypeArg) -> Self {
        match value {
            ArchetypeArg::Warrior => Archetype::Warrior,
            ArchetypeArg::Mage => Archetype::Mage,
            ArchetypeArg::Archer => Archetype::Archer,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Interactive battle: one hero against a goblin and an orc
    Demo {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Run a scripted encounter to completion and print the log
    Simulate {
        /// RNG seed; overrides the seed baked into the encounter
        #[arg(long)]
        seed: Option<u64>,
        /// Built-in encounter name
        #[arg(long, default_value = "goblin_ambush")]
        encounter: String,
        /// JSON file overriding the built-in encounter
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the full report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the fixed skill roster of an archetype
    Skills {
        #[arg(long, value_enum)]
        archetype: ArchetypeArg,
    },
    /// Roll a character and print it as JSON
    CharacterDump {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum)]
        archetype: ArchetypeArg,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(Parser)]
#[command(name = "battle-cli")]
#[command(about = "Turn-based battle CLI harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Demo { seed } => run_demo(seed)?,
        Cmd::Simulate {
            seed,
            encounter,
            config,
            json,
        } => run_simulate(seed, &encounter, config, json)?,
        Cmd::Skills { archetype } => {
            for skill in skills_for(archetype.into()) {
                println!(
                    "{:<16} {} (MP {}, damage {}, heal {}, {:?}): {}",
                    skill.id,
                    skill.name,
                    skill.mp_cost,
                    skill.damage,
                    skill.heal,
                    skill.target,
                    skill.description
                );
            }
        }
        Cmd::CharacterDump {
            seed,
            archetype,
            pretty,
        } => {
            let mut rng = Rng::from_seed(seed);
            let character = Character::new("dump_1", "Sample", archetype.into(), &mut rng);
            if pretty {
                println!("{}", serde_json::to_string_pretty(&character)?);
            } else {
                println!("{}", serde_json::to_string(&character)?);
            }
        }
    }
    Ok(())
}

fn run_simulate(
    seed: Option<u64>,
    encounter: &str,
    config: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let mut cfg = match config {
        Some(path) => api::load_config(&path)?,
        None => api::builtin_encounter(encounter)?,
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }

    let report = api::run_battle(&cfg)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_log(&report.log);
        println!();
        println!(
            "winner={} rounds={} exp={} gold={}",
            report.winner, report.rounds, report.reward.exp, report.reward.gold
        );
    }
    Ok(())
}

fn run_demo(seed: u64) -> Result<()> {
    println!("Welcome to the turn-based battle demo!");
    println!("==============================");

    let mut rng = Rng::from_seed(seed);
    let mut roster = Roster::new();

    let hero = roster.add(Character::new("player_1", "Hero", Archetype::Warrior, &mut rng));
    let goblin = roster.add(Character::new("enemy_1", "Goblin", Archetype::Warrior, &mut rng));
    let orc = roster.add(Character::new("enemy_2", "Orc", Archetype::Warrior, &mut rng));

    for id in [hero, goblin, orc] {
        let ch = roster.get(id);
        println!(
            "{}: level {}, HP {}/{}, MP {}/{}",
            ch.display_name(),
            ch.level,
            ch.hp,
            ch.max_hp,
            ch.mp,
            ch.max_mp
        );
    }

    let mut battle = Battle::new("demo_battle", Rng::from_seed(seed.wrapping_add(1)));
    let hero_participant = battle.add_participant(&roster, hero, true);
    battle.add_participant(&roster, goblin, false);
    battle.add_participant(&roster, orc, false);

    println!("\nThe battle begins!");
    battle.start(&roster);
    print_log(battle.log());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while battle.state() == BattleState::InProgress {
        println!("\n{}", "-".repeat(30));
        let Some(current) = battle.current_participant() else {
            break;
        };
        let current_name = roster.get(battle.participant(current).character).display_name();
        println!("Current turn: {current_name}");

        if current == hero_participant {
            let skills = skills_for(Archetype::Warrior);
            println!("\nAvailable skills:");
            for (i, skill) in skills.iter().enumerate() {
                println!("{}. {} (MP cost: {})", i + 1, skill.name, skill.mp_cost);
            }
            print!("\nChoose a skill (number): ");
            io::stdout().flush()?;
            let choice = read_index(&mut lines, skills.len());
            let mut selected = skills[choice].clone();
            if !selected.can_use(roster.get(hero)) {
                println!(
                    "Not enough MP for {}, falling back to the basic attack",
                    selected.name
                );
                selected = Skill::basic_attack();
            }
            if let Err(err) = battle.select_skill(&roster, current, &selected) {
                println!("Skill rejected: {err}");
            }

            let targets = battle.alive_participants();
            println!("\nChoose a target:");
            for (i, id) in targets.iter().enumerate() {
                let ch = roster.get(battle.participant(*id).character);
                println!(
                    "{}. {} (HP: {}/{})",
                    i + 1,
                    ch.display_name(),
                    ch.hp,
                    ch.max_hp
                );
            }
            print!("\nTarget (number): ");
            io::stdout().flush()?;
            let choice = read_index(&mut lines, targets.len());
            if let Err(err) = battle.select_target(current, targets[choice]) {
                println!("Target rejected: {err}");
            }
        }

        battle.execute_turn(&mut roster);

        if let Some(entry) = battle.log().last() {
            println!("[{}-{}] {}", entry.round, entry.turn, entry.text);
        }

        println!("\nStatus:");
        for id in battle.alive_participants() {
            let ch = roster.get(battle.participant(id).character);
            println!(
                "{}: HP {}/{}, MP {}/{}",
                ch.display_name(),
                ch.hp,
                ch.max_hp,
                ch.mp,
                ch.max_mp
            );
        }

        if current == hero_participant && battle.state() == BattleState::InProgress {
            print!("\nPress enter to continue...");
            io::stdout().flush()?;
            let _ = lines.next();
        }
    }

    println!("\n{}", "=".repeat(30));
    println!("The battle is over!");
    print_log(battle.log());

    if battle.state() == BattleState::PlayerWon {
        let reward = battle.reward().clone();
        println!("\nVictory! Rewards:");
        println!("Exp: {}", reward.exp);
        println!("Gold: {}", reward.gold);

        if reward.exp > 0 {
            let hero_char = roster.get_mut(hero);
            println!("\n{} gains {} exp", hero_char.display_name(), reward.exp);
            if hero_char.gain_exp(reward.exp, &mut rng) {
                println!("{} reaches level {}!", hero_char.display_name(), hero_char.level);
            }
        }
    }
    Ok(())
}

/// Reads a 1-based menu choice; anything unparsable or out of range falls
/// back to the first option.
fn read_index(lines: &mut impl Iterator<Item = io::Result<String>>, len: usize) -> usize {
    let choice = lines
        .next()
        .and_then(|line| line.ok())
        .and_then(|line| line.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if (1..=len).contains(&choice) {
        choice - 1
    } else {
        println!("Invalid choice, using the first option");
        0
    }
}

fn print_log(log: &[LogEntry]) {
    println!("\nBattle log:");
    for entry in log {
        println!("[{}-{}] {}", entry.round, entry.turn, entry.text);
    }
}
