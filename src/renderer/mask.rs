/// Binocular vignette laid over the gun-sight view.
///
/// Two clear circles side by side, radius `⌊W/3⌋`, centred at
/// `(⌊W/3⌋, ⌊W/2⌋)` and `(⌈W/1.5⌉, ⌊W/2⌋)`; everything else is opaque
/// black. Built once per surface size.
#[derive(Clone, Debug)]
pub struct LensMask {
    width: usize,
    height: usize,
    opaque: Vec<bool>,
}

impl LensMask {
    pub fn new(width: usize, height: usize) -> Self {
        let radius = (width / 3) as i64;
        let cy = (width / 2) as i64;
        let left = ((width / 3) as i64, cy);
        let right = ((width as f32 / 1.5).ceil() as i64, cy);
        let r2 = radius * radius;

        let inside = |(cx, cy): (i64, i64), x: i64, y: i64| {
            let (dx, dy) = (x - cx, y - cy);
            dx * dx + dy * dy <= r2
        };

        let mut opaque = Vec::with_capacity(width * height);
        for y in 0..height as i64 {
            for x in 0..width as i64 {
                opaque.push(!(inside(left, x, y) || inside(right, x, y)));
            }
        }
        Self {
            width,
            height,
            opaque,
        }
    }

    /// `true` where the mask blacks out the frame; outside the mask is clear.
    #[inline]
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.opaque[y * self.width + x]
    }
}
