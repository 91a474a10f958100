use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use bakery_ocr_table::Token;

/// A white page with `rows` horizontal and `cols` vertical ink rules.
pub fn ruled_page(rows: u32, cols: u32) -> DynamicImage {
    let mut page = GrayImage::from_pixel(400, 400, Luma([255]));
    for index in 0..rows {
        let y = 40 + i32::try_from(index * 55).expect("small offset");
        draw_filled_rect_mut(&mut page, Rect::at(30, y).of_size(340, 3), Luma([0]));
    }
    for index in 0..cols {
        let x = 40 + i32::try_from(index * 60).expect("small offset");
        draw_filled_rect_mut(&mut page, Rect::at(x, 30).of_size(3, 340), Luma([0]));
    }
    DynamicImage::ImageLuma8(page)
}

/// A page with a few short text-like blots and no rules.
pub fn plain_page() -> DynamicImage {
    let mut page = GrayImage::from_pixel(400, 300, Luma([250]));
    for line in 0..4 {
        draw_filled_rect_mut(
            &mut page,
            Rect::at(30, 40 + line * 50).of_size(60, 12),
            Luma([20]),
        );
    }
    DynamicImage::ImageLuma8(page)
}

pub fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("fixture should encode");
    bytes.into_inner()
}

/// Confident tokens laid out as rows of `(text, x)` pairs, one line per row.
pub fn token_grid(rows: &[&[(&str, u32)]]) -> Vec<Token> {
    rows.iter()
        .zip(0u32..)
        .flat_map(|(cells, line)| {
            cells
                .iter()
                .map(move |(text, x)| Token::new(*text, *x, 20 + line * 40, line, 92).with_size(40, 18))
        })
        .collect()
}
