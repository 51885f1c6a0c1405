//! Interactive controller for human players
//!
//! Reads choices line by line (stdin by default) in two steps: a category,
//! then a technique within it. Techniques the player's tokens don't unlock
//! are listed but refused.

use crate::catalog::Category;
use crate::game::controller::{ActionOption, ButtonState, MatchStateView, PlayerController};
use crate::game::resolution::Resolution;
use crate::game::rng::RandomSource;
use crate::game::state::Action;
use crate::game::MatchResult;
use crate::Result;
use std::io::{self, BufRead, BufReader, Write};

/// A controller that prompts a human for decisions
pub struct InteractiveController {
    input: Box<dyn BufRead>,
}

/// Outcome of reading one line
enum Input {
    Line(String),
    Eof,
}

impl InteractiveController {
    /// Prompt on stdout, read from stdin
    pub fn new() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    /// Read choices from any line source
    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        InteractiveController {
            input: Box::new(reader),
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Input> {
        print!("{prompt} ");
        // A failed flush only delays the prompt
        let _ = io::stdout().flush();

        let mut line = String::new();
        Ok(match self.input.read_line(&mut line)? {
            0 => Input::Eof,
            _ => Input::Line(line.trim().to_lowercase()),
        })
    }

    fn display_help(&self) {
        println!("\n=== Help ===");
        println!("  <number> - pick from the list");
        println!("  s        - show match status");
        println!("  b        - back to categories");
        println!("  ?        - this help\n");
    }

    fn display_status(&self, view: &MatchStateView) -> Result<()> {
        let state = view.state();
        let position = view.catalog().position(state.position)?;
        println!("\n--- Turn {} · {} ---", state.turn_number, position.name);
        println!("{}", view.initiative_text()?);
        println!("{}", view.scoreboard());

        let own = &state.tokens[view.side()];
        let opp = &state.tokens[view.side().opponent()];
        let names = |set: &crate::core::TokenSet| -> Result<String> {
            if set.is_empty() {
                return Ok("none".to_string());
            }
            let mut names = Vec::with_capacity(set.len());
            for token in set.iter() {
                let info = view.catalog().token_info(token)?;
                names.push(format!("{} {}", info.icon, info.name));
            }
            Ok(names.join(", "))
        };
        println!("Your tokens: {}", names(own)?);
        println!("Opponent tokens: {}", names(opp)?);
        println!(
            "Control: you {} · opponent {}",
            state.control[view.side()],
            state.control[view.side().opponent()]
        );
        Ok(())
    }

    fn pick_category(&mut self, view: &MatchStateView) -> Result<Option<Category>> {
        let categories = view.category_options()?;
        loop {
            println!();
            for (i, option) in categories.iter().enumerate() {
                let tag = match option.state {
                    ButtonState::Optimal => " (recommended)",
                    ButtonState::Risky => " (risky)",
                    ButtonState::Disabled => " (unavailable)",
                    ButtonState::Neutral => "",
                };
                println!(
                    "  {i}) {} {}{tag} - {}",
                    option.category.icon(),
                    option.category.name(),
                    option.category.hint()
                );
            }

            let line = match self.read_line("Category:")? {
                Input::Eof => return Ok(None),
                Input::Line(line) => line,
            };
            match line.as_str() {
                "?" => self.display_help(),
                "s" => self.display_status(view)?,
                _ => match line.parse::<usize>().ok().and_then(|i| categories.get(i)) {
                    Some(option) if option.is_available() => return Ok(Some(option.category)),
                    Some(_) => eprintln!("Nothing in that category from here."),
                    None => eprintln!("Enter 0-{}.", categories.len() - 1),
                },
            }
        }
    }

    /// Some(action) on a pick, None to go back
    fn pick_technique(
        &mut self,
        view: &MatchStateView,
        category: Category,
        options: &[ActionOption],
    ) -> Result<Option<Option<Action>>> {
        let techniques = view.technique_options(category)?;
        loop {
            println!();
            for (i, option) in techniques.iter().enumerate() {
                let lock = if option.usable { "" } else { " [locked]" };
                println!("  {i}) {}{lock} - {}", option.name, option.description);
            }

            let line = match self.read_line("Technique (b = back):")? {
                Input::Eof => return Ok(Some(None)),
                Input::Line(line) => line,
            };
            match line.as_str() {
                "b" => return Ok(None),
                "?" => self.display_help(),
                "s" => self.display_status(view)?,
                _ => match line.parse::<usize>().ok().and_then(|i| techniques.get(i)) {
                    Some(choice) if options.iter().any(|o| o.action == choice.action) => {
                        return Ok(Some(Some(choice.action)));
                    }
                    Some(_) => eprintln!("You don't have the tokens for that yet."),
                    None => eprintln!("Enter 0-{} or 'b'.", techniques.len().saturating_sub(1)),
                },
            }
        }
    }

    fn prompt(&mut self, view: &MatchStateView, options: &[ActionOption]) -> Result<Option<Action>> {
        self.display_status(view)?;
        loop {
            let Some(category) = self.pick_category(view)? else {
                return Ok(None);
            };
            if let Some(choice) = self.pick_technique(view, category, options)? {
                return Ok(choice);
            }
        }
    }
}

impl Default for InteractiveController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerController for InteractiveController {
    fn name(&self) -> &str {
        "you"
    }

    fn choose_action(
        &mut self,
        view: &MatchStateView,
        options: &[ActionOption],
        _rng: &mut dyn RandomSource,
    ) -> Result<Option<Action>> {
        if options.is_empty() {
            return Ok(None);
        }
        self.prompt(view, options)
    }

    fn on_resolution(&mut self, view: &MatchStateView, resolution: &Resolution) {
        match view.outcome_text(resolution) {
            Ok(text) => println!("\n{} · {}", text, view.tier_text(resolution)),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    fn on_match_end(&mut self, view: &MatchStateView, result: &MatchResult) {
        let headline = match result.winner {
            Some(side) if side == view.side() => "You win!",
            Some(_) => "You lose.",
            None => "Match stopped.",
        };
        println!("\n=== {headline} ===");
        if let Some(reason) = &result.end_reason {
            println!("{reason}");
        }
        println!("{}", view.scoreboard());
    }
}
