use crate::service::{FileSpan, Location, TextSpan};
use lsp_types as lsp;

impl From<lsp::Position> for Location {
	fn from(value: lsp::Position) -> Location {
		Location {
			line: value.line.saturating_add(1),
			offset: value.character.saturating_add(1),
		}
	}
}

impl From<Location> for lsp::Position {
	fn from(value: Location) -> lsp::Position {
		lsp::Position {
			line: value.line.saturating_sub(1),
			character: value.offset.saturating_sub(1),
		}
	}
}

impl From<TextSpan> for lsp::Range {
	fn from(value: TextSpan) -> lsp::Range {
		lsp::Range {
			start: value.start.into(),
			end: value.end.into(),
		}
	}
}

impl From<lsp::Range> for TextSpan {
	fn from(value: lsp::Range) -> TextSpan {
		TextSpan {
			start: value.start.into(),
			end: value.end.into(),
		}
	}
}

impl From<&FileSpan> for lsp::Range {
	fn from(value: &FileSpan) -> lsp::Range {
		lsp::Range {
			start: value.start.into(),
			end: value.end.into(),
		}
	}
}
