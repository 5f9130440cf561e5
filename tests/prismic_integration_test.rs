use portfolio_rust::cms::PrismicClient;

#[tokio::test]
async fn prismic_fetch_integration() {
    let repo = match std::env::var("PRISMIC_REPO") {
        Ok(repo) if !repo.trim().is_empty() => repo,
        _ => {
            eprintln!("PRISMIC_REPO not set; skipping integration test");
            return;
        }
    };
    let token = std::env::var("PRISMIC_ACCESS_TOKEN").ok().filter(|t| !t.trim().is_empty());
    let document_type = std::env::var("PRISMIC_DOCUMENT_TYPE").unwrap_or_else(|_| "homepage".into());

    let client = PrismicClient::new(&repo, token, 30, true).expect("client build failed");

    let reference = client.master_ref().await.expect("master ref request failed");
    assert!(!reference.is_empty());

    let section = client
        .fetch_section(&document_type)
        .await
        .expect("failed to fetch projects slice");
    for record in &section.projects {
        assert!(!record.slug().is_empty());
    }
}
