use dice_odds::{Scope, SessionState};
use std::io::{self, BufRead, Write};

const QUIT_WORDS: &[&str] = &["", "q", "quit", "no", "bye", "exit", "e", "-q", "-e"];
const DND_WORDS: &[&str] = &["dnd", "d&d", "crits", "criticals", "count crits"];
const RESET_WORDS: &[&str] = &["nocrit", "reboot", "rb", "boot"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut session = SessionState::new();
    print!(">>> ");
    io::stdout().flush()?;
    while let Some(line) = lines.next() {
        let line = line?;
        let command = line.trim().to_ascii_lowercase();
        if QUIT_WORDS.contains(&command.as_str()) {
            break;
        } else if DND_WORDS.contains(&command.as_str()) {
            session.mark_critical("d20", Scope::Persistent);
            println!("DnD mode active: d20s now announce critical rolls");
        } else if RESET_WORDS.contains(&command.as_str()) {
            session.reset();
            println!("Reset");
        } else {
            match dice_odds::interpret(&line, &mut session) {
                Ok(r) => {
                    for crit in &r.criticals {
                        println!("{}", crit);
                    }
                    println!(
                        "Got {} (out of {} maximum, {:.2} expected, F = {:.1}%)",
                        r.rolled,
                        r.max,
                        r.expected,
                        100.0 * r.percentile()
                    );
                }
                Err(why) => eprintln!("Error: {}", why),
            }
        }
        print!(">>> ");
        io::stdout().flush()?;
    }
    println!("Bye!");
    Ok(())
}
