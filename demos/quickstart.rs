//! Register two entities, make and fulfil a promise, then read the score.
//!
//! Run against a local ledger (or `cargo run --example mock_ledger`):
//!     SOZ_LEDGER_API_KEY=... cargo run --example quickstart

use serde_json::{json, Map};
use soz_ledger::{
    ClientConfig, CreateEntity, CreatePromise, EntityType, EvidenceType, LedgerClient,
    PromiseCategory, SubmitEvidence,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let api_key = std::env::var("SOZ_LEDGER_API_KEY").unwrap_or_else(|_| "your_api_key".into());
    let base_url =
        std::env::var("SOZ_LEDGER_URL").unwrap_or_else(|_| "http://localhost:8000".into());
    let client = LedgerClient::from_config(ClientConfig::new(api_key).with_base_url(base_url));

    // 1. Entities
    let agent = client
        .entities()
        .create(&CreateEntity::new("summary-agent", EntityType::Agent))
        .await?;
    println!("Created entity: {}", agent.id);

    let reviewer = client
        .entities()
        .create(&CreateEntity::new("review-service", EntityType::Service))
        .await?;
    println!("Created entity: {}", reviewer.id);

    // 2. Promise
    let promise = client
        .promises()
        .create(
            &CreatePromise::new(
                &agent.id,
                &reviewer.id,
                "Summarise the quarterly report into three bullet points",
            )
            .with_category(PromiseCategory::Delivery)
            .with_deadline("2025-12-31T23:59:59Z"),
        )
        .await?;
    println!("Promise created: {} status: {}", promise.id, promise.status);

    // 3. Evidence
    let mut payload = Map::new();
    payload.insert(
        "bullets".into(),
        json!([
            "Revenue grew 12% year-over-year.",
            "Customer churn decreased by 3 percentage points.",
            "New enterprise contracts doubled compared to Q2."
        ]),
    );
    let evidence = client
        .evidence()
        .submit(
            &promise.id,
            &SubmitEvidence::new(EvidenceType::Manual, &agent.id).with_payload(payload),
        )
        .await?;
    println!("Evidence submitted: {}", evidence.id);

    // 4. Fulfil
    let fulfilled = client.promises().fulfill(&promise.id).await?;
    println!("Promise status: {}", fulfilled.status);

    // 5. Score
    let score = client.scores().get(&agent.id).await?;
    println!("Trust score for {}:", agent.name);
    match score.overall_score {
        Some(value) => println!("  score: {value:.1} ({})", score.level),
        None => println!("  {} (not enough promises yet)", score.level),
    }

    Ok(())
}
