use crate::image::layout::Layout;
use crate::image::semantics::Semantics;

/// One mutable byte slice per image row, top to bottom, each exactly `row_bytes` long.
pub type RowPointers<'a> = Vec<&'a mut [u8]>;

/// Capabilities shared by owning buffers and views over caller memory.
pub trait PixelBuffer {
    fn layout(&self) -> Layout;

    fn semantics(&self) -> Semantics;

    fn data(&self) -> &[u8];

    fn data_mut(&mut self) -> &mut [u8];

    /// Releases owned memory (views only forget theirs) and invalidates the buffer.
    fn clear(&mut self);

    /// Makes the buffer ready to receive an image of the given shape.
    ///
    /// Owning buffers (re)allocate when needed. Views never allocate: they adopt the
    /// requested shape if the referenced memory is large enough and fail otherwise,
    /// before anything is written.
    fn prepare(&mut self, layout: Layout, semantics: Semantics) -> bool;

    fn is_valid(&self) -> bool {
        let layout = self.layout();
        layout.is_valid() && self.data().len() >= layout.total_bytes()
    }

    fn width(&self) -> u32 {
        self.layout().width
    }

    fn height(&self) -> u32 {
        self.layout().height
    }

    fn row(&self, y: u32) -> Option<&[u8]> {
        let layout = self.layout();
        if !self.is_valid() || y >= layout.height {
            return None;
        }
        let start = y as usize * layout.stride();
        self.data().get(start..start + layout.row_bytes())
    }

    /// Derives the row pointers from the current layout. Nothing is cached, so this can
    /// be called again after any change to the buffer.
    fn row_pointers(&mut self) -> RowPointers<'_> {
        if !self.is_valid() {
            return Vec::new();
        }
        let layout = self.layout();
        let stride = layout.stride();
        let row_bytes = layout.row_bytes();
        let height = layout.height as usize;
        self.data_mut()[..layout.total_bytes()]
            .chunks_mut(stride)
            .take(height)
            .map(|row| &mut row[..row_bytes])
            .collect()
    }
}

/// Image buffer owning its pixel memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    data: Vec<u8>,
    layout: Layout,
    semantics: Semantics,
}

impl ImageBuffer {
    /// Allocates zeroed memory of `stride * height` bytes. A zero stride is replaced by
    /// the tightly packed stride. An invalid layout yields an empty, invalid buffer.
    pub fn allocate(layout: Layout, semantics: Semantics) -> Self {
        let layout = layout.resolved();
        if !layout.is_valid() {
            return Self::default();
        }
        Self {
            data: vec![0u8; layout.total_bytes()],
            layout,
            semantics,
        }
    }

    pub fn nr_channels(&self) -> u16 {
        self.layout.nr_channels
    }

    pub fn stride_bytes(&self) -> usize {
        self.layout.stride()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrows the buffer's memory as a view with the same layout.
    pub fn as_view(&mut self) -> ImageView<'_> {
        ImageView {
            data: &mut self.data,
            layout: self.layout,
            semantics: self.semantics,
        }
    }
}

impl PixelBuffer for ImageBuffer {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn semantics(&self) -> Semantics {
        self.semantics
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    fn clear(&mut self) {
        self.data = Vec::new();
        self.layout = Layout::default();
        self.semantics = Semantics::default();
    }

    fn prepare(&mut self, layout: Layout, semantics: Semantics) -> bool {
        let layout = layout.resolved();
        if !layout.is_valid() {
            return false;
        }
        if self.layout == layout && self.data.len() == layout.total_bytes() {
            self.semantics = semantics;
            return true;
        }
        *self = Self::allocate(layout, semantics);
        true
    }
}

/// Non-owning image over caller memory.
///
/// The caller keeps ownership of the memory, which stays borrowed for the lifetime of
/// the view.
#[derive(Debug)]
pub struct ImageView<'a> {
    data: &'a mut [u8],
    layout: Layout,
    semantics: Semantics,
}

impl<'a> ImageView<'a> {
    /// A view over `data` without a declared shape yet; [`PixelBuffer::prepare`] gives
    /// it one.
    pub fn new(data: &'a mut [u8]) -> Self {
        Self {
            data,
            layout: Layout::default(),
            semantics: Semantics::default(),
        }
    }

    /// Returns `None` if `data` is shorter than `stride * height` of `layout`.
    pub fn view_over(data: &'a mut [u8], layout: Layout, semantics: Semantics) -> Option<Self> {
        let layout = layout.resolved();
        if !layout.is_valid() || data.len() < layout.total_bytes() {
            return None;
        }
        Some(Self {
            data,
            layout,
            semantics,
        })
    }

    /// Size of the referenced memory in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl PixelBuffer for ImageView<'_> {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn semantics(&self) -> Semantics {
        self.semantics
    }

    fn data(&self) -> &[u8] {
        &self.data[..]
    }

    fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data[..]
    }

    fn clear(&mut self) {
        self.data = Default::default();
        self.layout = Layout::default();
        self.semantics = Semantics::default();
    }

    fn prepare(&mut self, layout: Layout, semantics: Semantics) -> bool {
        let mut target = layout.resolved();
        if !target.is_valid() {
            return false;
        }
        // A wider stride declared by the caller for the same shape is kept.
        if self.layout.same_shape(&target) && self.layout.stride() > target.stride() {
            target.stride_bytes = self.layout.stride();
        }
        if self.data.len() < target.total_bytes() {
            return false;
        }
        self.layout = target;
        self.semantics = semantics;
        true
    }
}
