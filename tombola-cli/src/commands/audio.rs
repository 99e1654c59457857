use super::Context;
use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use std::path::PathBuf;
use tombola_core::{AssetKind, MediaAsset};

#[derive(Subcommand)]
pub enum AudioCommands {
    /// Show audio preferences and uploaded media
    Show,
    /// Switch background music on or off
    ToggleMusic,
    /// Switch sound effects on or off
    ToggleSound,
    /// Set volumes (0-100)
    Volume {
        #[arg(long)]
        music: Option<u8>,
        #[arg(long)]
        sound: Option<u8>,
    },
    /// Store a media file in a slot (bgm, roll, win, background)
    Upload { slot: String, file: PathBuf },
    /// Remove the media stored in a slot
    Remove { slot: String },
}

pub async fn handle_audio_command(cmd: AudioCommands, ctx: &mut Context) -> Result<()> {
    match cmd {
        AudioCommands::Show => show_audio(ctx).await,
        AudioCommands::ToggleMusic => {
            let enabled = ctx.session.audio_mut().toggle_music();
            ctx.save().await?;
            println!("Background music {}", on_off(enabled));
            Ok(())
        }
        AudioCommands::ToggleSound => {
            let enabled = ctx.session.audio_mut().toggle_sound();
            ctx.save().await?;
            println!("Sound effects {}", on_off(enabled));
            Ok(())
        }
        AudioCommands::Volume { music, sound } => {
            if music.is_none() && sound.is_none() {
                anyhow::bail!("Pass --music and/or --sound");
            }
            ctx.session.audio_mut().set_volumes(music, sound)?;
            ctx.save().await?;

            let audio = ctx.session.audio();
            println!(
                "Volumes: music {} / effects {}",
                audio.music_volume, audio.sound_volume
            );
            Ok(())
        }
        AudioCommands::Upload { slot, file } => {
            let kind: AssetKind = slot.parse()?;
            let asset = MediaAsset::from_file(kind, &file).await?;
            ctx.store.assets().save(&asset).await?;

            println!(
                "Stored {} in slot {} ({} bytes)",
                asset.file_name,
                kind,
                asset.size()?
            );
            Ok(())
        }
        AudioCommands::Remove { slot } => {
            let kind: AssetKind = slot.parse()?;
            ctx.store.assets().remove(kind).await?;
            println!("Cleared slot {}", kind);
            Ok(())
        }
    }
}

async fn show_audio(ctx: &Context) -> Result<()> {
    let audio = ctx.session.audio();
    println!(
        "Background music: {} (volume {})",
        on_off(audio.music_enabled),
        audio.music_volume
    );
    println!(
        "Sound effects:    {} (volume {})",
        on_off(audio.sound_enabled),
        audio.sound_volume
    );

    let assets = ctx.store.assets();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Slot", "File", "Type", "Uploaded"]);

    let stored = assets.list().await?;
    for kind in AssetKind::ALL {
        if !stored.contains(&kind) {
            table.add_row(vec![kind.to_string(), "-".to_string(), String::new(), String::new()]);
            continue;
        }

        // A bad checksum only affects its own slot
        let row = match assets.load(kind).await {
            Ok(Some(asset)) => vec![
                kind.to_string(),
                asset.file_name,
                asset.mime_type,
                asset.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
            ],
            Ok(None) => vec![kind.to_string(), "-".to_string(), String::new(), String::new()],
            Err(e) => vec![kind.to_string(), e.to_string(), String::new(), String::new()],
        };
        table.add_row(row);
    }

    println!("{}", table);
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
