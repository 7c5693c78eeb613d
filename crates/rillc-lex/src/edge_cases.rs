//! Edge case tests for rillc-lex


#[cfg(test)]
mod properties {
    use crate::{tokenize, Token};
    use proptest::prelude::*;

    proptest! {
        /// The lexer always terminates with exactly one Eof token or an
        /// error, regardless of input.
        #[test]
        fn lexer_totality(source in ".*") {
            if let Ok(tokens) = tokenize(&source) {
                let eof_count = tokens
                    .iter()
                    .filter(|st| st.token == Token::Eof)
                    .count();
                prop_assert_eq!(eof_count, 1);
                prop_assert_eq!(tokens.last().unwrap().token, Token::Eof);
            }
        }

        /// Any digit run that fits i64 lexes to that integer value.
        #[test]
        fn integer_literals_roundtrip(value in 0i64..=i64::MAX) {
            let tokens = tokenize(&value.to_string()).unwrap();
            prop_assert_eq!(tokens[0].token, Token::Integer(value));
        }

        /// Well-formed identifier text lexes to a single Ident token.
        #[test]
        fn identifiers_lex_whole(name in "[a-zA-Z][a-zA-Z0-9_]{0,20}") {
            prop_assume!(crate::keyword_from_ident(&name).is_none());
            let tokens = tokenize(&name).unwrap();
            prop_assert_eq!(tokens.len(), 2); // Ident + Eof
            prop_assert!(matches!(tokens[0].token, Token::Ident(_)));
        }

        /// Whitespace placement never changes the token sequence.
        #[test]
        fn whitespace_insensitive(pad in "[ \t\n]{0,4}") {
            let tight: Vec<Token> = tokenize("let x = 1 ;")
                .unwrap().into_iter().map(|st| st.token).collect();
            let padded: Vec<Token> = tokenize(&format!("{pad}let x{pad} = {pad}1 ;{pad}"))
                .unwrap().into_iter().map(|st| st.token).collect();
            prop_assert_eq!(tight, padded);
        }
    }
}
