//! Cross-module scenario tests: whole evaluation passes against fake
//! collaborators.
