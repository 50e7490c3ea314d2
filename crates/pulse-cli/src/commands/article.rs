use clap::Subcommand;
use pulse_core::routine::{article, ARTICLES};

#[derive(Subcommand)]
pub enum ArticleAction {
    /// List the article library (id, title, subtitle)
    List,
    /// Print one article as JSON
    Show {
        /// Article id
        id: u32,
        /// Print the paragraphs as plain text instead
        #[arg(long)]
        text: bool,
    },
}

pub fn run(action: ArticleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ArticleAction::List => {
            let cards: Vec<_> = ARTICLES
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "id": a.id,
                        "title": a.title,
                        "card_subtitle": a.card_subtitle,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        ArticleAction::Show { id, text } => {
            let found = article(id)?;
            if text {
                println!("{}\n", found.title);
                for paragraph in found.paragraphs {
                    println!("{paragraph}\n");
                }
                for source in found.sources {
                    println!("- {}: {}", source.label, source.url);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(found)?);
            }
        }
    }
    Ok(())
}
