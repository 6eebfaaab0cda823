//! Recommendation command: "what should I do now?"

use clap::Args;

use nextup_core::recommend::{recommend, RecommendationContext, ScoredTask};
use nextup_core::storage::TaskDb;
use nextup_core::task::EnergyLevel;

#[derive(Args)]
pub struct RecommendArgs {
    /// Available time in minutes
    #[arg(long)]
    pub time: u32,
    /// Current energy level: low, medium, or high
    #[arg(long)]
    pub energy: String,
    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

fn print_scored(scored: &ScoredTask, prefix: &str) {
    println!(
        "{prefix}{}  (score {}: deadline {}, energy {}, time {})",
        scored.task.title,
        scored.score,
        scored.breakdown.deadline_score,
        scored.breakdown.energy_match_score,
        scored.breakdown.time_efficiency_score
    );
}

pub fn run(args: RecommendArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.time == 0 {
        return Err("available time must be at least 1 minute".into());
    }
    let energy: EnergyLevel = args.energy.parse()?;

    let db = TaskDb::open()?;
    let user = db.ensure_local_user()?;
    let tasks = db.list_open_tasks(&user.id)?;

    let context = RecommendationContext {
        available_time_minutes: args.time,
        current_energy: energy,
    };
    let result = recommend(&tasks, &context);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.message);
    if let Some(top) = &result.recommended {
        println!();
        print_scored(top, "-> ");
        println!("   {}", top.explanation);
        if !result.alternatives.is_empty() {
            println!();
            println!("Also possible:");
            for alt in &result.alternatives {
                print_scored(alt, "   ");
            }
        }
    }

    Ok(())
}
