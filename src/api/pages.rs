//! Fixed HTML pages, compiled into the binary.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    About,
    Contact,
    QrGenerator,
}

impl Page {
    pub fn html(self) -> &'static str {
        match self {
            Page::Index => include_str!("../../templates/index.html"),
            Page::About => include_str!("../../templates/about.html"),
            Page::Contact => include_str!("../../templates/contact.html"),
            Page::QrGenerator => include_str!("../../templates/qr.html"),
        }
    }
}
