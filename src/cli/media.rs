use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, anyhow};

use crate::client::media::{decode_images, parse_points};
use crate::client::{ApiClient, ImageSettings, PointAnnotation, VideoSettings};

/// Generate images and write them as `image_<n>.png` into `out_dir`.
pub async fn image(
    client: &ApiClient,
    agent: &str,
    prompt: &str,
    count: u32,
    aspect_ratio: &str,
    out_dir: &str,
) -> Result<()> {
    let settings = ImageSettings {
        number_of_images: count,
        aspect_ratio: aspect_ratio.to_string(),
    };
    let response = client.generate_images(agent, prompt, &settings).await?;
    let images = decode_images(&response)?;
    if images.is_empty() {
        println!("No images were generated.");
        return Ok(());
    }

    tokio::fs::create_dir_all(out_dir).await?;
    for (i, data) in images.iter().enumerate() {
        let path = image_path(Path::new(out_dir), i);
        tokio::fs::write(&path, data).await?;
        println!("{}", path.display());
    }
    Ok(())
}

fn image_path(out_dir: &Path, index: usize) -> PathBuf {
    out_dir.join(format!("image_{}.png", index + 1))
}

pub async fn video(
    client: &ApiClient,
    agent: &str,
    prompt: &str,
    duration: u32,
    poll_interval: Duration,
) -> Result<()> {
    let settings = VideoSettings {
        duration_seconds: duration,
    };
    let operation = client.start_video(agent, prompt, &settings).await?;
    tracing::info!("Started video operation {}", operation.operation_name);
    println!("Generating video, this can take a few minutes...");

    let url = client
        .wait_for_video(&operation.operation_name, poll_interval)
        .await?;
    println!("{}", url);
    Ok(())
}

/// Find points in an image. With `size` the positions are printed in
/// pixels, otherwise on the 0..1000 grid the model answers in.
pub async fn robotics(
    client: &ApiClient,
    agent: &str,
    image: &str,
    prompt: &str,
    size: Option<(u32, u32)>,
) -> Result<()> {
    let data = tokio::fs::read(image).await?;
    let file_name = Path::new(image)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid image path {}", image))?;

    let response = client
        .process_robotics_image(agent, prompt, file_name, data)
        .await?;

    match parse_points(&response.result) {
        Ok(points) if points.is_empty() => println!("Nothing found."),
        Ok(points) => {
            for point in points {
                println!("{}", format_point(&point, size));
            }
        }
        Err(e) => {
            tracing::warn!("Could not parse points: {}", e);
            println!("{}", response.result);
        }
    }
    Ok(())
}

fn format_point(point: &PointAnnotation, size: Option<(u32, u32)>) -> String {
    let (x, y) = match size {
        Some((width, height)) => point.to_pixels(width, height),
        None => {
            let [y, x] = point.point;
            (x, y)
        }
    };
    format!(
        "{:>6.1} {:>6.1}  {}",
        x,
        y,
        point.label.as_deref().unwrap_or("")
    )
}
