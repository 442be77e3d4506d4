mod hop_cap;
mod reverse;
mod scenarios;
