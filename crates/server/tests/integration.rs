//! Integration tests for the SignBank server
//!
//! These drive the dispatcher the same way a connection task does, plus one
//! test over a real TCP socket.

use ed25519_dalek::{Signer, SigningKey};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signbank_core::Amount;
use signbank_ledger::{transfer_claims_bytes, TransactionStatus};
use signbank_proto::{codec, Payload, Request, Response, TransferRequest};
use signbank_server::{dispatch, AppState};

/// A client-side identity: a name plus the signing key that never leaves it.
struct TestAccount {
    name: String,
    key: SigningKey,
}

impl TestAccount {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    fn key_hex(&self) -> String {
        hex::encode(self.key.verifying_key().to_bytes())
    }

    /// Build a properly signed transfer request.
    fn signed_transfer(&self, receiver: &str, amount: Decimal, issued_at: &str) -> TransferRequest {
        let claims = transfer_claims_bytes(
            &self.name,
            receiver,
            Amount::new(amount).unwrap(),
            issued_at,
        );
        let signature = hex::encode(self.key.sign(&claims).to_bytes());

        TransferRequest {
            sender: self.name.clone(),
            receiver: receiver.to_string(),
            amount,
            issued_at: issued_at.to_string(),
            signature,
        }
    }
}

async fn register_all(state: &AppState, accounts: &[&TestAccount]) {
    for account in accounts {
        let response = dispatch::process(
            state,
            Request::Register {
                name: account.name.clone(),
                verification_key: account.key_hex(),
            },
        )
        .await;
        assert!(response.is_success(), "registration failed");
    }
}

fn success(response: Response) -> Payload {
    match response {
        Response::Success(payload) => payload,
        Response::Error { message } => panic!("expected success, got error: {message}"),
    }
}

async fn balance_of(state: &AppState, name: &str) -> Decimal {
    let response = dispatch::process(
        state,
        Request::GetBalance {
            name: name.to_string(),
        },
    )
    .await;
    success(response).balance.unwrap()
}

async fn submit(state: &AppState, transfer: TransferRequest) -> Response {
    dispatch::process(state, Request::MakeTransaction(transfer)).await
}

#[tokio::test]
async fn accepted_transfer_moves_funds() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    let response = submit(&state, alice.signed_transfer("bob", dec!(200), "t0")).await;
    let message = success(response).message.unwrap();
    assert!(message.contains("accepted"), "unexpected message: {message}");

    assert_eq!(balance_of(&state, "alice").await, dec!(800));
    assert_eq!(balance_of(&state, "bob").await, dec!(1200));

    // exactly one record, accepted, in the history
    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TransactionStatus::Accepted);
    assert_eq!(history[0].sender, "alice");
    assert_eq!(history[0].amount.value(), dec!(200));
}

#[tokio::test]
async fn wrong_signer_is_rejected_without_moving_funds() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    // bob signs a transfer that claims to come from alice
    let claims = transfer_claims_bytes("alice", "bob", Amount::new(dec!(200)).unwrap(), "t0");
    let forged = TransferRequest {
        sender: "alice".to_string(),
        receiver: "bob".to_string(),
        amount: dec!(200),
        issued_at: "t0".to_string(),
        signature: hex::encode(bob.key.sign(&claims).to_bytes()),
    };

    let message = success(submit(&state, forged).await).message.unwrap();
    assert!(message.contains("invalid signature"), "unexpected message: {message}");

    assert_eq!(balance_of(&state, "alice").await, dec!(1000));
    assert_eq!(balance_of(&state, "bob").await, dec!(1000));

    // the rejection is still recorded
    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TransactionStatus::Rejected);
}

#[tokio::test]
async fn unaffordable_transfer_is_rejected_with_reason() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    success(submit(&state, alice.signed_transfer("bob", dec!(200), "t0")).await);
    assert_eq!(balance_of(&state, "alice").await, dec!(800));

    // verified but unaffordable: a rejection, not a protocol error
    let message = success(submit(&state, alice.signed_transfer("bob", dec!(5000), "t1")).await)
        .message
        .unwrap();
    assert!(message.contains("insufficient funds"), "unexpected message: {message}");

    assert_eq!(balance_of(&state, "alice").await, dec!(800));
    assert_eq!(balance_of(&state, "bob").await, dec!(1200));
}

#[tokio::test]
async fn concurrent_double_spend_settles_exactly_once() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(800)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    let first = alice.signed_transfer("bob", dec!(600), "t0");
    let second = alice.signed_transfer("bob", dec!(600), "t1");

    let (r1, r2) = tokio::join!(submit(&state, first), submit(&state, second));
    success(r1);
    success(r2);

    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    let accepted = history
        .iter()
        .filter(|record| record.status == TransactionStatus::Accepted)
        .count();
    assert_eq!(accepted, 1, "exactly one of the two transfers may settle");
    assert_eq!(history.len(), 2);

    assert_eq!(balance_of(&state, "alice").await, dec!(200));
    assert_eq!(balance_of(&state, "bob").await, dec!(1400));
}

#[tokio::test]
async fn concurrent_transfers_conserve_total_balance() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let carol = TestAccount::new("carol");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob, &carol]).await;

    let mut requests = Vec::new();
    for i in 0..5 {
        requests.push(alice.signed_transfer("bob", dec!(100), &format!("a{i}")));
        requests.push(bob.signed_transfer("carol", dec!(150), &format!("b{i}")));
        requests.push(carol.signed_transfer("alice", dec!(200), &format!("c{i}")));
    }

    let mut handles = Vec::new();
    for request in requests {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            dispatch::process(&state, Request::MakeTransaction(request)).await
        }));
    }
    for handle in handles {
        // accepted or rejected, but never a protocol error
        success(handle.await.unwrap());
    }

    let a = balance_of(&state, "alice").await;
    let b = balance_of(&state, "bob").await;
    let c = balance_of(&state, "carol").await;

    assert_eq!(a + b + c, dec!(3000), "money must be conserved");
    assert!(a >= Decimal::ZERO);
    assert!(b >= Decimal::ZERO);
    assert!(c >= Decimal::ZERO);

    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert_eq!(history.len(), 15, "every attempt is recorded");
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let alice = TestAccount::new("alice");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice]).await;

    let imposter = TestAccount::new("alice");
    let response = dispatch::process(
        &state,
        Request::Register {
            name: "alice".to_string(),
            verification_key: imposter.key_hex(),
        },
    )
    .await;
    assert!(matches!(response, Response::Error { .. }));

    // the first key is still the one that signs
    let accepted = submit(&state, alice.signed_transfer("alice", dec!(1), "t0")).await;
    let message = success(accepted).message.unwrap();
    assert!(message.contains("accepted"));
    assert_eq!(balance_of(&state, "alice").await, dec!(1000));
}

#[tokio::test]
async fn history_preserves_processing_order() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    success(submit(&state, alice.signed_transfer("bob", dec!(200), "t0")).await);
    success(submit(&state, bob.signed_transfer("alice", dec!(50), "t1")).await);

    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sender, "alice");
    assert_eq!(history[1].sender, "bob");
    assert!(history[0].processed_at <= history[1].processed_at);
}

#[tokio::test]
async fn tampered_amount_fails_verification() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    // sign 200, then flip the digits to 700 and resubmit the old signature
    let mut transfer = alice.signed_transfer("bob", dec!(200), "t0");
    transfer.amount = dec!(700);

    let message = success(submit(&state, transfer).await).message.unwrap();
    assert!(message.contains("invalid signature"), "unexpected message: {message}");

    assert_eq!(balance_of(&state, "alice").await, dec!(1000));
    assert_eq!(balance_of(&state, "bob").await, dec!(1000));
}

#[tokio::test]
async fn unknown_parties_are_validation_errors_not_rejections() {
    let alice = TestAccount::new("alice");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice]).await;

    let to_nobody = submit(&state, alice.signed_transfer("nobody", dec!(10), "t0")).await;
    assert!(matches!(to_nobody, Response::Error { .. }));

    let ghost = TestAccount::new("ghost");
    let from_nobody = submit(&state, ghost.signed_transfer("alice", dec!(10), "t0")).await;
    assert!(matches!(from_nobody, Response::Error { .. }));

    // neither attempt is recorded
    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn non_positive_amounts_are_validation_errors() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    let zero = submit(&state, alice.signed_transfer("bob", dec!(0), "t0")).await;
    assert!(matches!(zero, Response::Error { .. }));

    let mut negative = alice.signed_transfer("bob", dec!(1), "t1");
    negative.amount = dec!(-5);
    let response = submit(&state, negative).await;
    assert!(matches!(response, Response::Error { .. }));

    assert_eq!(balance_of(&state, "alice").await, dec!(1000));
    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn read_queries_are_idempotent() {
    let alice = TestAccount::new("alice");
    let bob = TestAccount::new("bob");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice, &bob]).await;

    for _ in 0..5 {
        assert_eq!(balance_of(&state, "alice").await, dec!(1000));
        let users = success(dispatch::process(&state, Request::GetUsers).await)
            .users
            .unwrap();
        assert_eq!(users, vec!["alice", "bob"]);
    }

    let history = success(dispatch::process(&state, Request::GetTransactions).await)
        .transactions
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn login_confirms_existing_accounts_only() {
    let alice = TestAccount::new("alice");
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    register_all(&state, &[&alice]).await;

    let known = dispatch::process(
        &state,
        Request::Login {
            name: "alice".to_string(),
        },
    )
    .await;
    assert!(known.is_success());

    let unknown = dispatch::process(
        &state,
        Request::Login {
            name: "bob".to_string(),
        },
    )
    .await;
    assert!(matches!(unknown, Response::Error { .. }));
}

#[tokio::test]
async fn serves_requests_over_tcp() {
    use tokio::io::BufReader;
    use tokio::net::{TcpListener, TcpStream};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(Amount::new(dec!(1000)).unwrap());
    tokio::spawn(signbank_server::server::run(listener, state));

    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let alice = TestAccount::new("alice");
    let register = Request::Register {
        name: "alice".to_string(),
        verification_key: alice.key_hex(),
    };
    codec::write_message(&mut write_half, &register).await.unwrap();
    let line = codec::read_line(&mut reader).await.unwrap().unwrap();
    let response: Response = serde_json::from_str(&line).unwrap();
    assert!(response.is_success());

    // malformed input gets a structured error, not a dropped connection
    write_half_send(&mut write_half, "{\"action\":\"rob_the_bank\"}\n").await;
    let line = codec::read_line(&mut reader).await.unwrap().unwrap();
    let response: Response = serde_json::from_str(&line).unwrap();
    assert!(matches!(response, Response::Error { .. }));

    codec::write_message(&mut write_half, &Request::GetUsers).await.unwrap();
    let line = codec::read_line(&mut reader).await.unwrap().unwrap();
    let response: Response = serde_json::from_str(&line).unwrap();
    assert_eq!(success(response).users.unwrap(), vec!["alice"]);
}

async fn write_half_send(write_half: &mut tokio::net::tcp::OwnedWriteHalf, raw: &str) {
    use tokio::io::AsyncWriteExt;
    write_half.write_all(raw.as_bytes()).await.unwrap();
}
