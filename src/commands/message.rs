use clap::{Subcommand, ValueEnum};

use msgsync::models::{Message, MessageId};
use msgsync::sync::{MessageStore, MessageSynchronizer};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum MessageCommand {
    /// List messages in order
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Append a message to the end of the list
    Add {
        /// Message text
        content: String,
    },

    /// Delete a message and close the gap
    Delete {
        /// Message ID
        id: MessageId,
    },

    /// Move a message one place up
    Up {
        /// Message ID
        id: MessageId,
    },

    /// Move a message one place down
    Down {
        /// Message ID
        id: MessageId,
    },
}

impl MessageCommand {
    pub async fn run<S: MessageStore>(
        &self,
        sync: &MessageSynchronizer<S>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        sync.load().await?;

        match self {
            MessageCommand::List { format } => {
                print_messages(&sync.messages(), format)?;
                Ok(())
            }

            MessageCommand::Add { content } => {
                let created = sync.append(content).await?;
                println!("Added message #{}", created.id);
                print_messages(&sync.messages(), &OutputFormat::Text)?;
                Ok(())
            }

            MessageCommand::Delete { id } => {
                let outcome = sync.delete(*id).await?;
                println!("Deleted: {}", outcome.deleted.content);

                for failed in outcome.failed_ids() {
                    eprintln!(
                        "Warning: store did not accept the new position of message #{}",
                        failed
                    );
                }
                print_messages(&sync.messages(), &OutputFormat::Text)?;
                Ok(())
            }

            MessageCommand::Up { id } => {
                if !sync.move_up(*id).await? {
                    println!("Message #{} is already first", id);
                }
                print_messages(&sync.messages(), &OutputFormat::Text)?;
                Ok(())
            }

            MessageCommand::Down { id } => {
                if !sync.move_down(*id).await? {
                    println!("Message #{} is already last", id);
                }
                print_messages(&sync.messages(), &OutputFormat::Text)?;
                Ok(())
            }
        }
    }
}

fn print_messages(
    messages: &[Message],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(messages)?);
        }
        OutputFormat::Text => {
            if messages.is_empty() {
                println!("No messages");
                return Ok(());
            }

            println!("{:<6}  {:<8}  CONTENT", "ORDER", "ID");
            println!("{}", "-".repeat(60));
            for message in messages {
                println!("{:<6}  {:<8}  {}", message.order, message.id, message.content);
            }
            println!("\nTotal: {} message(s)", messages.len());
        }
    }
    Ok(())
}
