use marketplace_client::{
    MarketplaceClient, MarketplaceClientError, OfferInput, OfferStatus, PostInput,
};

fn client_with_token(var: &str) -> MarketplaceClient {
    let base_url = std::env::var("MARKETPLACE_HTTP_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
    let token = std::env::var(var).unwrap_or_else(|_| panic!("{var} must hold a bearer token"));

    let mut client = MarketplaceClient::new(base_url).expect("client must build");
    client.set_token(token);
    client
}

#[tokio::test]
#[ignore = "requires running HTTP server, database and two identity tokens"]
async fn http_smoke_flow() {
    let buyer = client_with_token("MARKETPLACE_BUYER_TOKEN");
    let dealer = client_with_token("MARKETPLACE_DEALER_TOKEN");

    let post = buyer
        .create_post(&PostInput {
            title: "Family SUV".to_string(),
            car_make: Some("Toyota".to_string()),
            zip_code: Some("94107".to_string()),
            price: 32000.0,
            ..Default::default()
        })
        .await
        .expect("create_post must succeed");
    assert_eq!(post.title, "Family SUV");

    let fetched = buyer.get_post(post.id).await.expect("get_post must succeed");
    assert_eq!(fetched.id, post.id);

    let listed = buyer
        .list_posts(Some(&post.user_id), 20, 0)
        .await
        .expect("list_posts must succeed");
    assert!(listed.posts.iter().any(|p| p.id == post.id));

    let offer = dealer
        .create_offer(&OfferInput {
            post_id: post.id,
            car_id: "car-42".to_string(),
            additional_message: Some("One owner".to_string()),
            status: None,
        })
        .await
        .expect("create_offer must succeed");
    assert_eq!(offer.status, OfferStatus::Pending);

    let accepted = buyer
        .update_offer_status(offer.id, OfferStatus::Accept)
        .await
        .expect("post owner may accept");
    assert_eq!(accepted.status, OfferStatus::Accept);

    let reopened = dealer
        .update_offer_status(offer.id, OfferStatus::Pending)
        .await
        .expect("any transition is allowed");
    assert_eq!(reopened.status, OfferStatus::Pending);

    let offers = buyer
        .list_offers(Some(post.id), None, 20, 0)
        .await
        .expect("list_offers must succeed");
    assert!(offers.offers.iter().any(|o| o.id == offer.id));

    let err = buyer
        .delete_offer(offer.id)
        .await
        .expect_err("only the dealer may delete");
    assert!(matches!(err, MarketplaceClientError::Forbidden));

    dealer
        .delete_offer(offer.id)
        .await
        .expect("delete_offer must succeed");
    buyer
        .delete_post(post.id)
        .await
        .expect("delete_post must succeed");

    let after_delete = buyer.get_post(post.id).await;
    assert!(matches!(after_delete, Err(MarketplaceClientError::NotFound)));
}
