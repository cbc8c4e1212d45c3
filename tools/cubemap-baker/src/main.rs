//! Bake an equirectangular panorama into six skybox faces.
//!
//! ```text
//! cubemap-baker milky_way.jpg --out textures/sky --size 1024 --format png
//! ```
//!
//! Writes `px`, `nx`, `py`, `ny`, `pz`, `nz` into the output directory, in the
//! face order the texture manifest expects.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use orrery_engine::assets::cubemap::{equirect_uv, sample_bilinear, CubeFace};
use thiserror::Error;

const MAX_FACE_SIZE: u32 = 8192;

#[derive(Debug, Error)]
pub enum BakeError {
    #[error("face size must be between 1 and {max}, got {0}", max = MAX_FACE_SIZE)]
    InvalidSize(u32),
    #[error("panorama {0} has no pixels")]
    EmptyPanorama(PathBuf),
    #[error("cannot create {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FaceFormat {
    Png,
    Jpg,
}

impl FaceFormat {
    fn extension(self) -> &'static str {
        match self {
            FaceFormat::Png => "png",
            FaceFormat::Jpg => "jpg",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            FaceFormat::Png => ImageFormat::Png,
            FaceFormat::Jpg => ImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cubemap-baker", version, about = "Convert an equirectangular panorama into six cube faces")]
pub struct Args {
    /// Equirectangular source image (2:1).
    pub panorama: PathBuf,
    /// Directory the faces are written to. Created if missing.
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,
    /// Edge length of each face in pixels.
    #[arg(short, long, default_value_t = 1024)]
    pub size: u32,
    #[arg(short, long, value_enum, default_value_t = FaceFormat::Png)]
    pub format: FaceFormat,
}

/// Render one face by sampling the panorama along each pixel's view ray.
pub fn bake_face(panorama: &RgbaImage, face: CubeFace, size: u32) -> RgbaImage {
    let (width, height) = panorama.dimensions();
    let fetch = |x: u32, y: u32| {
        let p = panorama.get_pixel(x, y).0;
        [p[0] as f32, p[1] as f32, p[2] as f32, p[3] as f32]
    };
    RgbaImage::from_fn(size, size, |x, y| {
        let uv = equirect_uv(face.pixel_direction(x, y, size));
        let c = sample_bilinear(width, height, uv, &fetch);
        Rgba(c.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}

/// All six faces, in manifest order.
pub fn bake(panorama: &RgbaImage, size: u32) -> Result<Vec<(CubeFace, RgbaImage)>, BakeError> {
    if size == 0 || size > MAX_FACE_SIZE {
        return Err(BakeError::InvalidSize(size));
    }
    Ok(CubeFace::ALL
        .iter()
        .map(|&face| {
            log::debug!("baking {}", face.file_stem());
            (face, bake_face(panorama, face, size))
        })
        .collect())
}

fn write_face(image: RgbaImage, path: &Path, format: FaceFormat) -> Result<(), BakeError> {
    let result = match format {
        FaceFormat::Png => image.save_with_format(path, format.image_format()),
        // JPEG has no alpha channel.
        FaceFormat::Jpg => DynamicImage::ImageRgba8(image)
            .to_rgb8()
            .save_with_format(path, format.image_format()),
    };
    result.map_err(|source| BakeError::Image { path: path.to_path_buf(), source })
}

/// Load, bake, and write. Returns the written paths.
pub fn run(args: &Args) -> Result<Vec<PathBuf>, BakeError> {
    let panorama = image::open(&args.panorama)
        .map_err(|source| BakeError::Image { path: args.panorama.clone(), source })?
        .to_rgba8();
    let (width, height) = panorama.dimensions();
    if width == 0 || height == 0 {
        return Err(BakeError::EmptyPanorama(args.panorama.clone()));
    }
    if width != height * 2 {
        log::warn!("panorama is {width}x{height}, expected 2:1; faces will be stretched");
    }
    log::info!("baking {} ({width}x{height}) into {}px faces", args.panorama.display(), args.size);

    let faces = bake(&panorama, args.size)?;
    std::fs::create_dir_all(&args.out).map_err(|source| BakeError::OutputDir { path: args.out.clone(), source })?;

    let mut written = Vec::with_capacity(faces.len());
    for (face, image) in faces {
        let path = args.out.join(format!("{}.{}", face.file_stem(), args.format.extension()));
        write_face(image, &path, args.format)?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
