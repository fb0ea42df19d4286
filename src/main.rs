fn main() {
    rocket_rescue::game::run();
}
