fn main() {
    career_coach::app::cli::run();
}
