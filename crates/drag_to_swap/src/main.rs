fn main() {
    drag_to_swap::run();
}
