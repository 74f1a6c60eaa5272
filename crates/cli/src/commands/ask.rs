//! `sommelier ask`: chat from the terminal without the web server.

use sommelier_agent::ChatService;

/// Asked when no message is given on the command line.
const SAMPLE_QUESTIONS: &[&str] = &[
    "What wines do you have available?",
    "What are your tasting room hours?",
    "What's the weather like today in Napa?",
    "Tell me about your Cabernet Sauvignon pricing",
    "What are the latest wine trends?",
    "Do you have any events this month?",
    "How much does wine tasting cost?",
];

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: OPENAI_API_KEY is not set.");
        eprintln!();
        eprintln!("  Add it to a .env file in this directory:");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        return Err("No completion API key found. See above for setup instructions.".into());
    }

    let service = ChatService::from_config(&config)?;

    match message {
        Some(message) => {
            let reply = service.chat(&message).await?;
            println!("{reply}");
        }
        None => {
            println!("🍷 {}: sample questions", config.winery_name);
            println!("{}", "=".repeat(80));
            for (i, question) in SAMPLE_QUESTIONS.iter().enumerate() {
                println!("\n🔍 {}/{}", i + 1, SAMPLE_QUESTIONS.len());
                println!("Q: {question}");
                match service.chat(question).await {
                    Ok(reply) => println!("A: {reply}"),
                    Err(e) => println!("❌ Error: {e}"),
                }
                println!("{}", "-".repeat(80));
            }
        }
    }

    Ok(())
}
