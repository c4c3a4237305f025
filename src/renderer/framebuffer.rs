use super::Rgba;

/// Row-major pixel surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    /// Resize in place (contents are undefined afterwards).
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, 0);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, colour: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = colour;
        }
    }

    /// Fill rows `y0 .. y1` of columns `x0 .. x1` (clipped).
    pub fn fill_rect(&mut self, x0: usize, x1: usize, y0: usize, y1: usize, colour: Rgba) {
        let (x1, y1) = (x1.min(self.width), y1.min(self.height));
        for y in y0..y1 {
            let row = y * self.width;
            if x0 < x1 {
                self.pixels[row + x0..row + x1].fill(colour);
            }
        }
    }

    /// Nearest-neighbour rescale of `self` into `dst`.
    pub fn scale_into(&self, dst: &mut FrameBuffer) {
        if self.width == 0 || self.height == 0 {
            dst.pixels.fill(0);
            return;
        }
        for y in 0..dst.height {
            let sy = y * self.height / dst.height;
            let src_row = &self.pixels[sy * self.width..(sy + 1) * self.width];
            let dst_row = &mut dst.pixels[y * dst.width..(y + 1) * dst.width];
            for (x, px) in dst_row.iter_mut().enumerate() {
                *px = src_row[x * self.width / dst.width];
            }
        }
    }

    pub fn scaled(&self, width: usize, height: usize) -> FrameBuffer {
        let mut out = FrameBuffer::new(width, height, 0);
        self.scale_into(&mut out);
        out
    }

    /// Integer Bresenham line; pixels outside the surface are skipped.
    pub fn draw_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, colour: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if x0 >= 0 && y0 >= 0 {
                self.put(x0 as usize, y0 as usize, colour);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
