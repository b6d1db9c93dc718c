use unicode_normalization::UnicodeNormalization as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermRejectCode {
	RejectTooLong,
	RejectTooManyTerms,
	RejectControlChar,
}

/// A normalized disjunctive search predicate.
///
/// A profile matches when any token is a case-insensitive substring of one of its searchable
/// fields. Only the term is NFKC-folded; stored fields are compared as written, lowercased, the
/// way `ILIKE` compares them. An empty token list means the caller asked for no term at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
	tokens: Vec<String>,
}
impl SearchTerm {
	pub fn parse(raw: &str, cfg: &amity_config::Search) -> Result<Self, TermRejectCode> {
		if raw.chars().count() > cfg.max_term_chars {
			return Err(TermRejectCode::RejectTooLong);
		}
		if raw.chars().any(char::is_control) {
			return Err(TermRejectCode::RejectControlChar);
		}

		let mut tokens: Vec<String> = Vec::new();

		for piece in raw.split(cfg.term_delimiter.as_str()) {
			let token = fold(piece);

			if token.is_empty() || tokens.contains(&token) {
				continue;
			}

			tokens.push(token);
		}

		if tokens.len() > cfg.max_terms {
			return Err(TermRejectCode::RejectTooManyTerms);
		}

		Ok(Self { tokens })
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn matches_any<'a, I>(&self, fields: I) -> bool
	where
		I: IntoIterator<Item = &'a str>,
	{
		let lowered: Vec<String> = fields.into_iter().map(str::to_lowercase).collect();

		self.tokens.iter().any(|token| lowered.iter().any(|field| field.contains(token.as_str())))
	}

	/// `ILIKE` patterns, one per token, with wildcard characters escaped.
	pub fn like_patterns(&self) -> Vec<String> {
		self.tokens.iter().map(|token| format!("%{}%", escape_like(token))).collect()
	}
}

pub fn fold(input: &str) -> String {
	input.trim().nfkc().collect::<String>().to_lowercase()
}

fn escape_like(token: &str) -> String {
	let mut out = String::with_capacity(token.len());

	for ch in token.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
