//! One visit to the site: an anonymous preview that runs out, a sign-up,
//! then the things only members can do.
//!
//! `RUST_LOG=debug cargo run -p listening-session` shows the gate's
//! decisions as well.

use std::time::Duration;

use mobhouse::prelude::*;

const PREVIEW_SECS: u64 = 3;

#[tokio::main]
async fn main() -> Result<(), MobHouseError> {
    mobhouse::init_tracing();

    let site = Site::builder()
        .preview_window_secs(PREVIEW_SECS)
        .auth_latency_ms(250)
        .build_demo();

    // The UI bridge: every gate notification as a JSON line.
    let mut events = site.gate().subscribe().await?;
    let bridge = tokio::spawn(async move {
        let codec = JsonCodec;
        while let Some(event) = events.recv().await {
            match codec.encode(&event) {
                Ok(bytes) => println!("  ui <- {}", String::from_utf8_lossy(&bytes)),
                Err(e) => tracing::warn!(error = %e, "could not encode gate event"),
            }
        }
    });

    site.gate()
        .on_auth_prompt(|prompt| {
            println!("  [sign-in dialog opens: {}]", prompt.action);
        })
        .await?;

    println!("Mixes:");
    for mix in site.catalog().await.mixes(None) {
        println!(
            "  {} {:<18} {:<8} {:>6}  {}",
            mix.id,
            mix.title,
            mix.artist,
            mix.length.to_string(),
            mix.genre
        );
    }

    println!("\nAnonymous visitor presses play on mix-1");
    site.play_mix(MixId(1)).await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    if let Some(snapshot) = site.gate().preview_snapshot().await? {
        println!("  {}s of preview left", snapshot.remaining_ms / 1_000);
    }
    tokio::time::sleep(Duration::from_secs(PREVIEW_SECS)).await;

    println!("\nAnonymous visitor tries to download mix-1");
    if let Gated::PromptedForAuth = site.download_mix(MixId(1)).await? {
        println!("  download needs an account");
    }

    println!("\nVisitor signs up");
    let identity = site
        .sign_up(&SignUpForm {
            name: "Night Owl".into(),
            email: "owl@mobhouse.example".into(),
            password: "afrohouse".into(),
            confirm_password: "afrohouse".into(),
        })
        .await?;
    println!("  welcome, {}", identity.display_name().unwrap_or("listener"));

    if let Some(download) = site.download_mix(MixId(1)).await?.granted() {
        println!("  downloading {}", download.file_name);
    }
    if let Some(ticket) = site.buy_ticket(EventId(4)).await?.granted() {
        println!("  checkout: {} for KES {}", ticket.title, ticket.price_kes);
    }
    site.play_mix(MixId(2)).await?;

    let stats = site.catalog().await.stats();
    println!(
        "\nCatalog: {} DJs, {} mixes, {} plays, {} tickets sold",
        stats.dj_count, stats.mix_count, stats.total_plays, stats.tickets_sold
    );

    site.sign_out().await?;
    site.shutdown().await?;
    let _ = bridge.await;
    Ok(())
}
