//! Interactive console chat.

use std::io::Write as _;
use std::sync::Arc;

use futures::StreamExt;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use raven_chat::ChatSession;
use raven_tts::{spawn_synthesize, TtsClient};

/// Run the interactive loop until `quit`, `exit`, Ctrl-C, or Ctrl-D.
///
/// Replies stream to the terminal fragment by fragment; `rebuild` forces
/// the vector index to be rebuilt in place.
pub async fn run(session: Arc<ChatSession>, tts: Option<Arc<TtsClient>>) -> anyhow::Result<()> {
    session.initialize(false).await?;

    println!();
    println!("Raven is listening. 'quit' to leave, 'rebuild' to rebuild the index.");
    println!();

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if matches!(input, "quit" | "exit") {
                    println!("raven> Finally, some silence.");
                    break;
                }
                rl.add_history_entry(input).ok();

                if input == "rebuild" {
                    match session.initialize(true).await {
                        Ok(()) => println!(
                            "index rebuilt ({} entries)",
                            session.index_len().await.unwrap_or(0)
                        ),
                        Err(e) => println!("rebuild failed: {e}"),
                    }
                    continue;
                }

                print!("raven> ");
                std::io::stdout().flush()?;

                match session.ask_stream_with_transcript(input).await {
                    Ok((mut stream, transcript)) => {
                        while let Some(fragment) = stream.next().await {
                            print!("{fragment}");
                            std::io::stdout().flush()?;
                        }
                        println!();
                        println!();

                        if let Some(tts) = &tts {
                            if let Ok(text) = transcript.await {
                                spawn_synthesize(Arc::clone(tts), text);
                            }
                        }
                    }
                    Err(e) => println!("error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("raven> Interrupted. Typical.");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
