// Example: PSP34 and timelock walkthrough on a local node
//
// Deploys both contracts on an in-process chain, mints and transfers a
// token, then schedules and executes a delayed `update_delay` through the
// timelock.
//
// Run this example with:
//   cargo run --example local_node_demo
//
// Log verbosity follows SHOWGAME_LOG_LEVEL (default info).

use anyhow::Result;
use showgame_common::logger::setup_logger;
use showgame_contracts::timelock_controller::UPDATE_DELAY;
use showgame_daemon::config::log_level;
use showgame_testing_framework::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logger(log_level(), None)?;

    println!("========================================");
    println!("Showgame local node demo");
    println!("========================================\n");

    let env = TestEnv::new().await?;
    println!(
        "Chain {} at block #{}\n",
        env.api.chain_name(),
        env.api.best_block().await?.number
    );

    demo_psp34(&env).await?;
    demo_timelock(&env).await?;

    env.teardown().await;
    println!("\nDemo completed");
    Ok(())
}

async fn demo_psp34(env: &TestEnv) -> Result<()> {
    println!("PSP34");
    println!("--------------------------------------");

    let charlie = env.charlie();
    let alice = env.alice();
    let psp34 = deploy_psp34(&env.api, charlie).await?;
    println!("  deployed at {}", psp34.address());

    psp34.tx().mint_token().await?;
    psp34.tx().mint(Id::Bytes(b"showgame".to_vec())).await?;
    println!(
        "  total supply: {}",
        psp34.query().total_supply().await?.value
    );

    psp34
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await?;
    println!(
        "  balances after transfer: Charlie {} Alice {}",
        psp34.query().balance_of(charlie.address()).await?.value,
        psp34.query().balance_of(alice.address()).await?.value
    );

    match psp34
        .with_signer(alice)
        .tx()
        .transfer(alice.address(), Id::Bytes(b"showgame".to_vec()), Vec::new())
        .await
    {
        Ok(_) => println!("  unexpected: Alice moved a token she does not own"),
        Err(err) => println!("  Alice cannot move Charlie's token: {}", err),
    }
    println!();
    Ok(())
}

async fn demo_timelock(env: &TestEnv) -> Result<()> {
    println!("TimelockController");
    println!("--------------------------------------");

    let alice = env.alice();
    let bob = env.bob();
    let timelock = deploy_timelock(&env.api, alice, 0, &[bob.address()], &[bob.address()]).await?;
    println!("  deployed at {}", timelock.address());

    let delay = Duration::from_secs(30);
    let transaction =
        message_transaction(timelock.abi(), timelock.address(), UPDATE_DELAY, &60u64)?;
    let id = hash_operation(&transaction, &None, &salt(0));

    let as_bob = timelock.with_signer(bob);
    as_bob
        .tx()
        .schedule(&transaction, None, salt(0), delay.as_millis() as u64)
        .await?;
    println!(
        "  scheduled {}, ready: {}",
        id,
        timelock.query().is_operation_ready(&id).await?.value
    );

    env.advance_time(delay).await?;
    println!(
        "  after {:?}, ready: {}",
        delay,
        timelock.query().is_operation_ready(&id).await?.value
    );

    as_bob.tx().execute(&transaction, None, salt(0)).await?;
    println!(
        "  executed, min delay is now {}",
        timelock.query().get_min_delay().await?.value
    );
    Ok(())
}
